use axum::{
    routing::{get, post},
    Router,
};

use super::{control, health, history, sensor, status, AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/snapshot", get(status::get_snapshot))
        .route("/status", get(status::get_status))
        .route("/history", get(history::get_history))
        .route("/setpoint", get(control::get_setpoint).put(control::set_setpoint))
        .route("/sensor", post(sensor::post_sensor_event))
        .with_state(state)
}
