use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{error::ApiError, response::ApiResponse, AppState};
use crate::streaming::SetpointRelay;

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SetpointRequest {
    pub t_set: f64,
}

#[derive(Debug, Serialize)]
pub struct SetpointResponse {
    pub t_set: f64,
    pub min_c: f64,
    pub max_c: f64,
}

/// GET /api/v1/setpoint
pub async fn get_setpoint(State(state): State<AppState>) -> ApiResponse<SetpointResponse> {
    let relay = state.runtime.setpoint_relay();
    let band = relay.band();
    ApiResponse::success(SetpointResponse {
        t_set: relay.current(),
        min_c: band.min_c,
        max_c: band.max_c,
    })
}

/// PUT /api/v1/setpoint
///
/// Relays the value toward the sensor side; a later step picks it up as `T_set`.
pub async fn set_setpoint(
    State(state): State<AppState>,
    Json(req): Json<SetpointRequest>,
) -> Result<ApiResponse<SetpointResponse>, ApiError> {
    let relay = state.runtime.setpoint_relay();
    relay.relay(req.t_set).await?;

    let band = relay.band();
    Ok(ApiResponse::success(SetpointResponse {
        t_set: relay.current(),
        min_c: band.min_c,
        max_c: band.max_c,
    }))
}
