use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::physics::derivatives;
use crate::domain::{ParameterError, ParameterSet, SensorEvent, StateVector, StepResult};

/// Fixed-step forward-Euler integrator for one zone.
///
/// Owns the state vector and the energy meter; nothing else can mutate them.
/// The step size is fixed at construction. It is the caller's job to keep it
/// well below [`ParameterSet::min_time_constant_s`], oversized steps are not
/// detected.
#[derive(Debug, Clone)]
pub struct ZoneIntegrator {
    params: Arc<ParameterSet>,
    state: StateVector,
    dt_seconds: f64,
    cumulative_energy_kwh: f64,
    steps: u64,
}

impl ZoneIntegrator {
    pub fn new(
        params: Arc<ParameterSet>,
        initial: StateVector,
        dt_seconds: f64,
    ) -> Result<Self, ParameterError> {
        params.validate()?;
        if !dt_seconds.is_finite() || dt_seconds <= 0.0 {
            return Err(ParameterError::InvalidParameter {
                name: "dt_seconds",
                value: dt_seconds,
            });
        }

        tracing::debug!(
            zone_temp_c = initial.zone_temp_c,
            wall_temp_c = initial.wall_temp_c,
            co2_ppm = initial.co2_ppm,
            dt_seconds,
            "zone integrator initialized"
        );

        Ok(Self {
            params,
            state: initial,
            dt_seconds,
            cumulative_energy_kwh: 0.0,
            steps: 0,
        })
    }

    pub fn state(&self) -> StateVector {
        self.state
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn dt_seconds(&self) -> f64 {
        self.dt_seconds
    }

    pub fn cumulative_energy_kwh(&self) -> f64 {
        self.cumulative_energy_kwh
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance the model by one step using the derivatives at the current state.
    pub fn step(&mut self, input: &SensorEvent, timestamp: DateTime<Utc>) -> StepResult {
        let d = derivatives(&self.state, input, &self.params);
        let dt = self.dt_seconds;

        self.state.zone_temp_c += d.zone_temp_c_per_s * dt;
        self.state.wall_temp_c += d.wall_temp_c_per_s * dt;
        self.state.co2_ppm += d.co2_ppm_per_s * dt;

        let power_kw = d.power_kw();
        self.cumulative_energy_kwh += power_kw * dt / 3600.0;
        self.steps += 1;

        StepResult {
            step: self.steps,
            timestamp,
            zone_temp_c: self.state.zone_temp_c,
            wall_temp_c: self.state.wall_temp_c,
            co2_ppm: self.state.co2_ppm,
            power_kw,
            cumulative_energy_kwh: self.cumulative_energy_kwh,
            hvac_mode: d.hvac.mode,
            occupants: input.occupants,
            setpoint_c: input.setpoint_c,
        }
    }
}
