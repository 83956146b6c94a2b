//! Right-hand side of the zone model.
//!
//! Everything here is a pure function of (state, input, parameters) so it can
//! be evaluated and tested without an integrator.

use serde::{Deserialize, Serialize};

use crate::domain::{
    HvacMode, ParameterSet, SensorEvent, StateVector, INTERNAL_GAIN_PER_OCCUPANT_W,
    OUTDOOR_CO2_PPM,
};

/// HVAC heat exchange and electrical draw at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HvacLoad {
    /// Heat removed from the zone (kW). Negative while heating.
    pub heat_removal_kw: f64,
    /// Electrical input including fan (kW), never negative
    pub electrical_kw: f64,
    pub mode: HvacMode,
}

/// Instantaneous rates of change plus the power drawn at this state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Derivatives {
    /// dT_z/dt (K/s)
    pub zone_temp_c_per_s: f64,
    /// dT_w/dt (K/s)
    pub wall_temp_c_per_s: f64,
    /// dCO2_z/dt (ppm/s)
    pub co2_ppm_per_s: f64,
    pub hvac: HvacLoad,
}

impl Derivatives {
    pub fn power_kw(&self) -> f64 {
        self.hvac.electrical_kw
    }
}

/// Proportional supply-air model: the unit moves `m_air * c_p * (T_z - T_set)`.
///
/// `heat_removal_kw` keeps the sign of `T_z - T_set`, so subtracting it in the
/// zone balance always pulls T_z toward the setpoint.
pub fn hvac_power(zone_temp_c: f64, setpoint_c: f64, params: &ParameterSet) -> HvacLoad {
    let delta = zone_temp_c - setpoint_c;
    let heat_removal_kw = params.hvac_conductance_kw_per_k() * delta;

    if delta > 0.0 {
        HvacLoad {
            heat_removal_kw,
            electrical_kw: heat_removal_kw / params.cop_cool + params.fan_power_kw,
            mode: HvacMode::Cooling,
        }
    } else if delta < 0.0 {
        HvacLoad {
            heat_removal_kw,
            electrical_kw: heat_removal_kw.abs() / params.cop_heat + params.fan_power_kw,
            mode: HvacMode::Heating,
        }
    } else {
        HvacLoad {
            heat_removal_kw: 0.0,
            electrical_kw: 0.0,
            mode: HvacMode::Idle,
        }
    }
}

/// Internal gain for an input (W)
pub fn internal_gain_w(input: &SensorEvent) -> f64 {
    input
        .internal_gain_w
        .unwrap_or(INTERNAL_GAIN_PER_OCCUPANT_W * f64::from(input.occupants))
}

pub fn derivatives(state: &StateVector, input: &SensorEvent, params: &ParameterSet) -> Derivatives {
    let StateVector {
        zone_temp_c: t_z,
        wall_temp_c: t_w,
        co2_ppm,
    } = *state;
    let t_out = input.outdoor_temp_c;

    let hvac = hvac_power(t_z, input.setpoint_c, params);

    // Gains arrive in W; the balance runs in kW
    let q_internal_kw = internal_gain_w(input) / 1000.0;
    let q_solar_kw = input.solar_gain_w / 1000.0;

    let zone_balance_kw = (t_out - t_z) / params.r_oa_k_per_kw
        + (t_w - t_z) / params.r_wz_k_per_kw
        + q_internal_kw
        - hvac.heat_removal_kw;

    let wall_balance_kw = (t_z - t_w) / params.r_wz_k_per_kw
        + (t_out - t_w) / params.r_ow_k_per_kw
        + q_solar_kw;

    // Occupant generation L/s -> m³/s; 1e6 restores ppm
    let generation_m3_s = params.co2_per_occupant_l_s * f64::from(input.occupants) / 1000.0;
    let co2_ppm_per_s = (params.infiltration_m3_s() * (OUTDOOR_CO2_PPM - co2_ppm)
        + generation_m3_s * 1e6)
        / params.zone_volume_m3;

    Derivatives {
        zone_temp_c_per_s: zone_balance_kw / params.c_zone_kj_per_k,
        wall_temp_c_per_s: wall_balance_kw / params.c_wall_kj_per_k,
        co2_ppm_per_s,
        hvac,
    }
}
