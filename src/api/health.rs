use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    producer: ComponentHealth,
    history: HistoryFill,
}

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ComponentHealth {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            error: None,
        }
    }

    fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryFill {
    len: usize,
    capacity: usize,
}

/// GET /api/v1/health
///
/// 503 once the producer task has stopped; readers would only see a frozen window.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let running = state.runtime.is_producer_running();
    let producer = if running {
        ComponentHealth::healthy()
    } else {
        ComponentHealth::unhealthy("producer task not running")
    };

    let history = state.runtime.history();
    let response = HealthResponse {
        status: if running { "healthy" } else { "degraded" }.to_string(),
        timestamp: chrono::Utc::now(),
        checks: HealthChecks {
            producer,
            history: HistoryFill {
                len: history.len(),
                capacity: history.capacity(),
            },
        },
    };

    let status_code = if running {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_health() {
        let health = ComponentHealth::healthy();
        assert_eq!(health.status, "healthy");
        assert!(health.error.is_none());

        let health = ComponentHealth::unhealthy("stopped");
        assert_eq!(health.status, "unhealthy");
        assert_eq!(health.error.as_deref(), Some("stopped"));
    }
}
