pub mod control;
pub mod error;
pub mod health;
pub mod history;
pub mod response;
pub mod sensor;
pub mod status;
pub mod v1;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::Config, streaming::TwinRuntime};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub runtime: Arc<TwinRuntime>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(cfg: Config, runtime: Arc<TwinRuntime>) -> Self {
        Self {
            cfg: Arc::new(cfg),
            runtime,
            started_at: Instant::now(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cfg = Arc::clone(&state.cfg);
    let mut router = Router::new().nest("/api/v1", v1::router(state));

    if cfg.server.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(HeaderValue::from_static("http://localhost:3000"))
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_headers([header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(64 * 1024))
                .layer(TimeoutLayer::new(Duration::from_secs(cfg.server.request_timeout_secs))),
        )
        .layer(TraceLayer::new_for_http())
}
