//! Offline runs over a prepared input series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::integrator::ZoneIntegrator;
use crate::domain::{ParameterError, ParameterSet, StateVector, TimedSensorEvent};

/// CO₂ level assumed at the start of a series (ppm)
pub const SERIES_INITIAL_CO2_PPM: f64 = 600.0;

/// One row of a series run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub time: DateTime<Utc>,
    pub zone_temp_c: f64,
    pub wall_temp_c: f64,
    pub co2_ppm: f64,
    pub power_kw: f64,
    pub cumulative_energy_kwh: f64,
    /// Zone temperature one hour later, if the series reaches that far
    pub zone_temp_c_h1: Option<f64>,
    /// CO₂ one hour later, if the series reaches that far
    pub co2_ppm_h1: Option<f64>,
}

/// Energy consumed within one clock hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyEnergy {
    pub hour: DateTime<Utc>,
    pub energy_kwh: f64,
}

/// Run the model over `inputs`, one step per row.
///
/// Zone and wall start at the first row's setpoint. An empty series yields no
/// records.
pub fn run_series(
    inputs: &[TimedSensorEvent],
    params: &ParameterSet,
    dt_seconds: f64,
) -> Result<Vec<SeriesRecord>, ParameterError> {
    let Some(first) = inputs.first() else {
        return Ok(Vec::new());
    };

    let initial = StateVector::uniform(first.event.setpoint_c, SERIES_INITIAL_CO2_PPM);
    let mut sim = ZoneIntegrator::new(Arc::new(params.clone()), initial, dt_seconds)?;

    let mut records: Vec<SeriesRecord> = inputs
        .iter()
        .map(|row| {
            let r = sim.step(&row.event, row.time);
            SeriesRecord {
                time: row.time,
                zone_temp_c: r.zone_temp_c,
                wall_temp_c: r.wall_temp_c,
                co2_ppm: r.co2_ppm,
                power_kw: r.power_kw,
                cumulative_energy_kwh: r.cumulative_energy_kwh,
                zone_temp_c_h1: None,
                co2_ppm_h1: None,
            }
        })
        .collect();

    let horizon = (3600.0 / dt_seconds) as usize;
    for i in 0..records.len() {
        if let Some(ahead) = i.checked_add(horizon).and_then(|j| records.get(j)) {
            let (zone, co2) = (ahead.zone_temp_c, ahead.co2_ppm);
            records[i].zone_temp_c_h1 = Some(zone);
            records[i].co2_ppm_h1 = Some(co2);
        }
    }

    tracing::debug!(rows = records.len(), horizon, "series run complete");
    Ok(records)
}

/// Per-hour energy: last cumulative reading of each clock hour, differenced
/// against the previous hour. The first hour has no predecessor and is dropped.
pub fn hourly_energy(records: &[SeriesRecord]) -> Vec<HourlyEnergy> {
    let mut last_per_hour: Vec<(i64, f64)> = Vec::new();
    for record in records {
        let bucket = record.time.timestamp().div_euclid(3600);
        match last_per_hour.last_mut() {
            Some((hour, energy)) if *hour == bucket => *energy = record.cumulative_energy_kwh,
            _ => last_per_hour.push((bucket, record.cumulative_energy_kwh)),
        }
    }

    last_per_hour
        .windows(2)
        .filter_map(|pair| {
            let (hour, energy) = pair[1];
            DateTime::from_timestamp(hour * 3600, 0).map(|hour| HourlyEnergy {
                hour,
                energy_kwh: energy - pair[0].1,
            })
        })
        .collect()
}
