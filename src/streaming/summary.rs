use serde::Serialize;

use crate::domain::{StepResult, StateVector};

/// Aggregate view over a copied history window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub samples: usize,
    pub first_step: u64,
    pub last_step: u64,
    pub latest: StateVector,
    pub latest_power_kw: f64,
    pub latest_setpoint_c: f64,
    pub latest_occupants: u32,
    pub mean_zone_temp_c: f64,
    pub peak_co2_ppm: f64,
    pub mean_power_kw: f64,
    /// Energy drawn by the steps inside the window (kWh)
    pub window_energy_kwh: f64,
    /// Energy since the integrator started (kWh)
    pub total_energy_kwh: f64,
}

impl WindowSummary {
    /// `None` for an empty window.
    pub fn from_window(window: &[StepResult], dt_seconds: f64) -> Option<Self> {
        let first = window.first()?;
        let last = window.last()?;
        let n = window.len() as f64;

        let mean_zone_temp_c = window.iter().map(|r| r.zone_temp_c).sum::<f64>() / n;
        let mean_power_kw = window.iter().map(|r| r.power_kw).sum::<f64>() / n;
        let peak_co2_ppm = window
            .iter()
            .map(|r| r.co2_ppm)
            .fold(f64::NEG_INFINITY, f64::max);

        // The first entry's own increment belongs to the window too
        let before_window = first.cumulative_energy_kwh - first.power_kw * dt_seconds / 3600.0;

        Some(Self {
            samples: window.len(),
            first_step: first.step,
            last_step: last.step,
            latest: last.state(),
            latest_power_kw: last.power_kw,
            latest_setpoint_c: last.setpoint_c,
            latest_occupants: last.occupants,
            mean_zone_temp_c,
            peak_co2_ppm,
            mean_power_kw,
            window_energy_kwh: (last.cumulative_energy_kwh - before_window).max(0.0),
            total_energy_kwh: last.cumulative_energy_kwh,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParameterSet, SensorEvent};
    use crate::simulation::ZoneIntegrator;
    use chrono::Utc;
    use std::sync::Arc;

    #[test]
    fn test_empty_window() {
        assert!(WindowSummary::from_window(&[], 300.0).is_none());
    }

    #[test]
    fn test_window_energy_matches_step_powers() {
        let mut sim = ZoneIntegrator::new(
            Arc::new(ParameterSet::default()),
            StateVector::new(18.0, 19.0, 600.0),
            300.0,
        )
        .unwrap();
        let results: Vec<StepResult> = (0..10)
            .map(|i| sim.step(&SensorEvent::new(30.0, i, 23.0), Utc::now()))
            .collect();

        // Window over the last four steps only
        let window = &results[6..];
        let summary = WindowSummary::from_window(window, 300.0).unwrap();
        let expected: f64 = window.iter().map(|r| r.power_kw * 300.0 / 3600.0).sum();

        assert_eq!(summary.samples, 4);
        assert_eq!((summary.first_step, summary.last_step), (7, 10));
        assert!((summary.window_energy_kwh - expected).abs() < 1e-9);
        assert_eq!(summary.total_energy_kwh, results[9].cumulative_energy_kwh);
        assert_eq!(summary.latest_occupants, 9);
        let peak = window.iter().map(|r| r.co2_ppm).fold(0.0, f64::max);
        assert_eq!(summary.peak_co2_ppm, peak);
    }
}
