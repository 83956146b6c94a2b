use chrono::{DateTime, Duration, Utc};
use std::f64::consts::PI;

use crate::domain::{SensorEvent, TimedSensorEvent};

/// Synthetic day: sinusoidal outdoor temperature around 25 °C (±5), an
/// occupancy hump reaching 20 people, constant 24 °C setpoint.
pub fn synthetic_day(start: DateTime<Utc>, periods: usize, step: Duration) -> Vec<TimedSensorEvent> {
    let span = periods.saturating_sub(1).max(1) as f64;

    (0..periods)
        .map(|i| {
            let x = i as f64 / span;
            let outdoor_temp_c = 25.0 + 5.0 * (2.0 * PI * x).sin();
            let occupancy_phase = -1.0 + x * (3.0 * PI + 1.0);
            let occupants = (occupancy_phase.sin().max(0.0) * 20.0) as u32;

            TimedSensorEvent {
                time: start + step * i as i32,
                event: SensorEvent::new(outdoor_temp_c, occupants, 24.0),
            }
        })
        .collect()
}
