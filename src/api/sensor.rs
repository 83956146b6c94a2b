use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tokio::sync::mpsc::error::TrySendError;

use super::{error::ApiError, AppState};
use crate::streaming::SensorPayload;

/// POST /api/v1/sensor - inbound transport for raw sensor payloads.
///
/// The body is queued as-is; field checks happen in the producer, which logs
/// and drops malformed events without touching the history.
pub async fn post_sensor_event(
    State(state): State<AppState>,
    Json(payload): Json<SensorPayload>,
) -> Result<impl IntoResponse, ApiError> {
    match state.runtime.sensor_sender().try_send(payload) {
        Ok(()) => Ok((
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "queued": true })),
        )),
        Err(TrySendError::Full(_)) => Err(ApiError::ServiceUnavailable(
            "sensor queue is full".to_string(),
        )),
        Err(TrySendError::Closed(_)) => Err(ApiError::ServiceUnavailable(
            "producer has stopped".to_string(),
        )),
    }
}
