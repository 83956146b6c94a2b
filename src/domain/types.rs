use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ============================================================================
// Model State
// ============================================================================

/// Evolving state of the zone model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    /// Zone air temperature (°C)
    pub zone_temp_c: f64,
    /// Wall mass temperature (°C)
    pub wall_temp_c: f64,
    /// Zone CO₂ concentration (ppm)
    pub co2_ppm: f64,
}

impl StateVector {
    pub fn new(zone_temp_c: f64, wall_temp_c: f64, co2_ppm: f64) -> Self {
        Self {
            zone_temp_c,
            wall_temp_c,
            co2_ppm,
        }
    }

    /// Zone and wall at the same temperature with a given CO₂ level
    pub fn uniform(temp_c: f64, co2_ppm: f64) -> Self {
        Self::new(temp_c, temp_c, co2_ppm)
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// One decoded sensor reading, consumed by exactly one integration step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorEvent {
    /// Outdoor air temperature (°C)
    pub outdoor_temp_c: f64,
    /// People in the zone
    pub occupants: u32,
    /// Target zone temperature (°C)
    pub setpoint_c: f64,
    /// Solar gain into the wall mass (W)
    pub solar_gain_w: f64,
    /// Internal gain override (W); `None` means 100 W per occupant
    pub internal_gain_w: Option<f64>,
}

impl SensorEvent {
    pub fn new(outdoor_temp_c: f64, occupants: u32, setpoint_c: f64) -> Self {
        Self {
            outdoor_temp_c,
            occupants,
            setpoint_c,
            solar_gain_w: 0.0,
            internal_gain_w: None,
        }
    }

    pub fn with_solar_gain(mut self, solar_gain_w: f64) -> Self {
        self.solar_gain_w = solar_gain_w;
        self
    }

    pub fn with_internal_gain(mut self, internal_gain_w: f64) -> Self {
        self.internal_gain_w = Some(internal_gain_w);
        self
    }
}

/// Sensor event pinned to a point in time, used for offline series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedSensorEvent {
    pub time: DateTime<Utc>,
    pub event: SensorEvent,
}

// ============================================================================
// Outputs
// ============================================================================

/// HVAC operating mode for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HvacMode {
    Cooling,
    Heating,
    Idle,
}

/// Immutable record of one completed integration step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// 1-based step counter of the integrator that produced this result
    pub step: u64,
    pub timestamp: DateTime<Utc>,
    /// Zone air temperature after the step (°C)
    pub zone_temp_c: f64,
    /// Wall mass temperature after the step (°C)
    pub wall_temp_c: f64,
    /// Zone CO₂ after the step (ppm)
    pub co2_ppm: f64,
    /// Electrical power drawn during the step (kW)
    pub power_kw: f64,
    /// Energy since integrator creation (kWh)
    pub cumulative_energy_kwh: f64,
    pub hvac_mode: HvacMode,
    pub occupants: u32,
    /// Setpoint echoed from the input (°C)
    pub setpoint_c: f64,
}

impl StepResult {
    pub fn state(&self) -> StateVector {
        StateVector::new(self.zone_temp_c, self.wall_temp_c, self.co2_ppm)
    }
}
