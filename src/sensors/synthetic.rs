use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::SensorEvent;
use crate::streaming::{encode_event, SensorPayload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSensorConfig {
    pub publish_interval_secs: u64,
    /// Mean outdoor temperature (°C)
    pub outdoor_base_c: f64,
    /// Uniform jitter around the mean (°C)
    pub outdoor_jitter_c: f64,
    pub max_occupants: u32,
}

impl Default for SyntheticSensorConfig {
    fn default() -> Self {
        Self {
            publish_interval_secs: 5,
            outdoor_base_c: 25.0,
            outdoor_jitter_c: 2.0,
            max_occupants: 15,
        }
    }
}

/// Stand-in for a field sensor: random outdoor temperature and occupancy,
/// with `T_set` taken from the latest relayed setpoint.
pub struct SyntheticSensorSource {
    config: SyntheticSensorConfig,
    setpoint: watch::Receiver<f64>,
    rng: StdRng,
}

impl SyntheticSensorSource {
    pub fn new(config: SyntheticSensorConfig, setpoint: watch::Receiver<f64>) -> Self {
        Self {
            config,
            setpoint,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(config: SyntheticSensorConfig, setpoint: watch::Receiver<f64>, seed: u64) -> Self {
        Self {
            config,
            setpoint,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw the next reading
    pub fn next_event(&mut self) -> SensorEvent {
        let jitter = self.config.outdoor_jitter_c.abs();
        let offset = if jitter > 0.0 {
            self.rng.gen_range(-jitter..=jitter)
        } else {
            0.0
        };
        let outdoor_temp_c = ((self.config.outdoor_base_c + offset) * 100.0).round() / 100.0;
        let occupants = self.rng.gen_range(0..=self.config.max_occupants);
        let setpoint_c = *self.setpoint.borrow_and_update();

        SensorEvent::new(outdoor_temp_c, occupants, setpoint_c)
    }

    /// Publish one reading per interval until shutdown or until the producer
    /// side hangs up.
    pub async fn run(mut self, tx: mpsc::Sender<SensorPayload>, shutdown: CancellationToken) {
        let period = Duration::from_secs(self.config.publish_interval_secs.max(1));
        let mut interval = tokio::time::interval(period);
        info!(interval_secs = period.as_secs(), "synthetic sensor source started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {}
            }

            let event = self.next_event();
            debug!(
                outdoor_temp_c = event.outdoor_temp_c,
                occupants = event.occupants,
                setpoint_c = event.setpoint_c,
                "publishing synthetic reading"
            );
            if tx.send(encode_event(&event)).await.is_err() {
                warn!("sensor channel closed, stopping synthetic source");
                break;
            }
        }

        info!("synthetic sensor source stopped");
    }

    pub fn spawn(self, tx: mpsc::Sender<SensorPayload>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(tx, shutdown))
    }
}
