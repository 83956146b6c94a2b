use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outdoor CO₂ baseline used by the infiltration balance (ppm)
pub const OUTDOOR_CO2_PPM: f64 = 400.0;

/// Sensible heat gain per occupant when no explicit internal gain is reported (W)
pub const INTERNAL_GAIN_PER_OCCUPANT_W: f64 = 100.0;

/// Construction-time parameter errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("Invalid parameter {name}: {value} (must be finite and > 0)")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Physical constants of a single conditioned zone.
///
/// Two capacitive nodes (zone air + furniture, inner wall mass) joined by
/// three resistances to each other and to outdoor air:
///
/// - C_z * dT_z/dt = (T_out - T_z)/R_oa + (T_w - T_z)/R_wz + Q_int - Q_hvac
/// - C_w * dT_w/dt = (T_z - T_w)/R_wz + (T_out - T_w)/R_ow + Q_sol
///
/// Capacitances are in kJ/K, which equals kW·s/K, so dividing a kW balance
/// by them yields K/s directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Outdoor air to zone air (K/kW)
    pub r_oa_k_per_kw: f64,
    /// Wall mass to zone air (K/kW)
    pub r_wz_k_per_kw: f64,
    /// Outdoor air to wall mass (K/kW)
    pub r_ow_k_per_kw: f64,
    /// Zone air and furniture (kJ/K)
    pub c_zone_kj_per_k: f64,
    /// Inner wall mass (kJ/K)
    pub c_wall_kj_per_k: f64,
    pub cop_cool: f64,
    pub cop_heat: f64,
    /// Fan draw whenever the unit runs (kW)
    pub fan_power_kw: f64,
    /// Supply air mass flow (kg/s)
    pub air_mass_flow_kg_s: f64,
    pub zone_volume_m3: f64,
    /// Infiltration (1/h)
    pub air_changes_per_hour: f64,
    /// CO₂ generation per occupant (L/s)
    pub co2_per_occupant_l_s: f64,
    /// Specific heat of air (kJ/(kg·K))
    pub air_specific_heat_kj_kg_k: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            r_oa_k_per_kw: 3.0,
            r_wz_k_per_kw: 1.6,
            r_ow_k_per_kw: 2.0,
            c_zone_kj_per_k: 3_000.0,
            c_wall_kj_per_k: 15_000.0,
            cop_cool: 3.5,
            cop_heat: 3.0,
            fan_power_kw: 1.2,
            air_mass_flow_kg_s: 2.5,
            zone_volume_m3: 240.0,
            air_changes_per_hour: 0.4,
            co2_per_occupant_l_s: 0.005,
            air_specific_heat_kj_kg_k: 1.006,
        }
    }
}

impl ParameterSet {
    /// Check every constant is finite and strictly positive.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let fields = [
            ("r_oa_k_per_kw", self.r_oa_k_per_kw),
            ("r_wz_k_per_kw", self.r_wz_k_per_kw),
            ("r_ow_k_per_kw", self.r_ow_k_per_kw),
            ("c_zone_kj_per_k", self.c_zone_kj_per_k),
            ("c_wall_kj_per_k", self.c_wall_kj_per_k),
            ("cop_cool", self.cop_cool),
            ("cop_heat", self.cop_heat),
            ("fan_power_kw", self.fan_power_kw),
            ("air_mass_flow_kg_s", self.air_mass_flow_kg_s),
            ("zone_volume_m3", self.zone_volume_m3),
            ("air_changes_per_hour", self.air_changes_per_hour),
            ("co2_per_occupant_l_s", self.co2_per_occupant_l_s),
            ("air_specific_heat_kj_kg_k", self.air_specific_heat_kj_kg_k),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParameterError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// Heat-exchange capacity of the supply air stream (kW/K)
    pub fn hvac_conductance_kw_per_k(&self) -> f64 {
        self.air_mass_flow_kg_s * self.air_specific_heat_kj_kg_k
    }

    /// Infiltration volume flow (m³/s)
    pub fn infiltration_m3_s(&self) -> f64 {
        self.air_changes_per_hour * self.zone_volume_m3 / 3600.0
    }

    /// Shortest first-order time constant of the network (s).
    ///
    /// Forward Euler needs `dt` well below this value.
    pub fn min_time_constant_s(&self) -> f64 {
        let zone_conductance = 1.0 / self.r_oa_k_per_kw
            + 1.0 / self.r_wz_k_per_kw
            + self.hvac_conductance_kw_per_k();
        let wall_conductance = 1.0 / self.r_wz_k_per_kw + 1.0 / self.r_ow_k_per_kw;
        let co2_rate = self.infiltration_m3_s() / self.zone_volume_m3;

        (self.c_zone_kj_per_k / zone_conductance)
            .min(self.c_wall_kj_per_k / wall_conductance)
            .min(1.0 / co2_rate)
    }
}
