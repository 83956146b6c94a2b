//! # Streaming Core
//!
//! Decouples the arrival of sensor events from the cadence at which readers
//! poll results.
//!
//! ```text
//!  transport ──payload──▶ mpsc ──▶ Producer (owns ZoneIntegrator) ──push──▶ History
//!                                                                             │
//!  readers ◀──────────────── snapshot / latest (copied under the lock) ───────┘
//!  operator ──setpoint──▶ SetpointRelay ──watch──▶ sensor source ──▶ next payload
//! ```

pub mod consumer;
pub mod feedback;
pub mod history;
pub mod ingest;
pub mod producer;
pub mod summary;

pub use consumer::spawn_snapshot_logger;
pub use feedback::{SetpointBand, SetpointError, SetpointRelay, WatchSetpointRelay};
pub use history::{History, DEFAULT_HISTORY_CAPACITY};
pub use ingest::{decode_payload, decode_slice, encode_event, IngestError, SensorPayload};
pub use producer::{Producer, ProducerCounts, ProducerStats};
pub use summary::WindowSummary;

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::{ParameterError, ParameterSet, StateVector};
use crate::simulation::ZoneIntegrator;

/// Everything fixed at startup
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub dt_seconds: f64,
    pub history_capacity: usize,
    pub initial_state: StateVector,
    /// Payloads buffered between transports and the producer
    pub channel_capacity: usize,
    pub default_setpoint_c: f64,
    pub setpoint_band: SetpointBand,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            dt_seconds: 300.0,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            initial_state: StateVector::new(18.0, 19.0, 600.0),
            channel_capacity: 64,
            default_setpoint_c: 24.0,
            setpoint_band: SetpointBand::default(),
        }
    }
}

/// Running twin: a producer task plus the handles readers and transports need.
pub struct TwinRuntime {
    history: Arc<History>,
    sensor_tx: mpsc::Sender<SensorPayload>,
    relay: Arc<WatchSetpointRelay>,
    stats: Arc<ProducerStats>,
    shutdown: CancellationToken,
    producer: Mutex<Option<JoinHandle<()>>>,
    dt_seconds: f64,
}

impl TwinRuntime {
    /// Build the integrator and spawn the producer. Must run inside a Tokio runtime.
    pub fn start(params: ParameterSet, settings: RuntimeSettings) -> Result<Self, ParameterError> {
        let integrator =
            ZoneIntegrator::new(Arc::new(params), settings.initial_state, settings.dt_seconds)?;

        let history = Arc::new(History::new(settings.history_capacity));
        let stats = Arc::new(ProducerStats::default());
        let (sensor_tx, sensor_rx) = mpsc::channel(settings.channel_capacity.max(1));
        let relay = Arc::new(WatchSetpointRelay::new(
            settings.default_setpoint_c,
            settings.setpoint_band,
        ));
        let shutdown = CancellationToken::new();

        let producer = Producer::new(integrator, Arc::clone(&history), Arc::clone(&stats));
        let handle = tokio::spawn(producer.run(sensor_rx, shutdown.clone()));

        info!(
            dt_seconds = settings.dt_seconds,
            history_capacity = history.capacity(),
            default_setpoint_c = settings.default_setpoint_c,
            "twin runtime started"
        );

        Ok(Self {
            history,
            sensor_tx,
            relay,
            stats,
            shutdown,
            producer: Mutex::new(Some(handle)),
            dt_seconds: settings.dt_seconds,
        })
    }

    /// Inbound side for transports
    pub fn sensor_sender(&self) -> mpsc::Sender<SensorPayload> {
        self.sensor_tx.clone()
    }

    pub fn history(&self) -> Arc<History> {
        Arc::clone(&self.history)
    }

    pub fn setpoint_relay(&self) -> Arc<WatchSetpointRelay> {
        Arc::clone(&self.relay)
    }

    /// Latest setpoint for sensor sources
    pub fn setpoint_watch(&self) -> tokio::sync::watch::Receiver<f64> {
        self.relay.subscribe()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn stats(&self) -> ProducerCounts {
        self.stats.counts()
    }

    pub fn dt_seconds(&self) -> f64 {
        self.dt_seconds
    }

    pub fn is_producer_running(&self) -> bool {
        self.producer
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Summary over the current window
    pub fn summary(&self) -> Option<WindowSummary> {
        WindowSummary::from_window(&self.history.snapshot(), self.dt_seconds)
    }

    /// Cancel every task tied to the runtime and wait for the producer to finish.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let handle = self.producer.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "producer task ended abnormally");
            }
        }
    }
}
