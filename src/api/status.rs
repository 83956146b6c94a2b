use axum::extract::State;
use serde::Serialize;

use super::{response::ApiResponse, AppState};
use crate::domain::StepResult;
use crate::streaming::{ProducerCounts, SetpointRelay, WindowSummary};

/// Latest step, or the empty sentinel before the first one
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub has_data: bool,
    pub latest: Option<StepResult>,
}

#[derive(Debug, Serialize)]
pub struct TwinStatus {
    pub uptime_seconds: u64,
    pub version: &'static str,
    pub producer_running: bool,
    pub dt_seconds: f64,
    pub setpoint_c: f64,
    pub history_len: usize,
    pub history_capacity: usize,
    pub events: ProducerCounts,
    pub summary: Option<WindowSummary>,
}

/// GET /api/v1/snapshot
pub async fn get_snapshot(State(state): State<AppState>) -> ApiResponse<SnapshotResponse> {
    let latest = state.runtime.history().latest();
    ApiResponse::success(SnapshotResponse {
        has_data: latest.is_some(),
        latest,
    })
}

/// GET /api/v1/status - window summary plus producer counters
pub async fn get_status(State(state): State<AppState>) -> ApiResponse<TwinStatus> {
    let runtime = &state.runtime;
    let history = runtime.history();

    ApiResponse::success(TwinStatus {
        uptime_seconds: state.started_at.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION"),
        producer_running: runtime.is_producer_running(),
        dt_seconds: runtime.dt_seconds(),
        setpoint_c: runtime.setpoint_relay().current(),
        history_len: history.len(),
        history_capacity: history.capacity(),
        events: runtime.stats(),
        summary: runtime.summary(),
    })
}
