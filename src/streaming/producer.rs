use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::history::History;
use super::ingest::{decode_payload, IngestError, SensorPayload};
use crate::domain::StepResult;
use crate::simulation::ZoneIntegrator;

/// Counters shared between the producer and its observers
#[derive(Debug, Default)]
pub struct ProducerStats {
    accepted: AtomicU64,
    rejected: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProducerCounts {
    pub accepted: u64,
    pub rejected: u64,
}

impl ProducerStats {
    pub fn counts(&self) -> ProducerCounts {
        ProducerCounts {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

/// Write side of the twin: the only owner of the integrator and the only
/// writer of the history.
pub struct Producer {
    integrator: ZoneIntegrator,
    history: Arc<History>,
    stats: Arc<ProducerStats>,
}

impl Producer {
    pub fn new(integrator: ZoneIntegrator, history: Arc<History>, stats: Arc<ProducerStats>) -> Self {
        Self {
            integrator,
            history,
            stats,
        }
    }

    pub fn integrator(&self) -> &ZoneIntegrator {
        &self.integrator
    }

    /// Decode one payload, step the model and publish the result.
    ///
    /// A payload that fails to decode is counted and returned as an error
    /// before the integrator or the history is touched.
    pub fn ingest(&mut self, payload: &SensorPayload) -> Result<StepResult, IngestError> {
        self.ingest_at(payload, Utc::now())
    }

    pub fn ingest_at(
        &mut self,
        payload: &SensorPayload,
        timestamp: DateTime<Utc>,
    ) -> Result<StepResult, IngestError> {
        let event = decode_payload(payload).inspect_err(|_| {
            self.stats.rejected.fetch_add(1, Ordering::Relaxed);
        })?;

        // Stepping happens outside the history lock; only the append is guarded
        let result = self.integrator.step(&event, timestamp);
        self.history.push(result.clone());
        self.stats.accepted.fetch_add(1, Ordering::Relaxed);

        debug!(
            step = result.step,
            zone_temp_c = result.zone_temp_c,
            co2_ppm = result.co2_ppm,
            power_kw = result.power_kw,
            energy_kwh = result.cumulative_energy_kwh,
            mode = %result.hvac_mode,
            "zone model stepped"
        );
        Ok(result)
    }

    /// Consume payloads until shutdown is requested or every sender is gone.
    ///
    /// A step that has started always completes before the loop checks for
    /// shutdown again.
    pub async fn run(mut self, mut rx: mpsc::Receiver<SensorPayload>, shutdown: CancellationToken) {
        info!(
            dt_seconds = self.integrator.dt_seconds(),
            history_capacity = self.history.capacity(),
            "producer started"
        );

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("producer shutdown requested");
                    break;
                }
                message = rx.recv() => match message {
                    Some(payload) => {
                        if let Err(e) = self.ingest(&payload) {
                            warn!(error = %e, field = e.field(), "rejected sensor payload");
                        }
                    }
                    None => {
                        info!("sensor channel closed");
                        break;
                    }
                },
            }
        }

        let counts = self.stats.counts();
        info!(
            accepted = counts.accepted,
            rejected = counts.rejected,
            energy_kwh = self.integrator.cumulative_energy_kwh(),
            "producer stopped"
        );
    }
}
