//! HTTP surface exercised in-process with `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use hvac_twin::api::{router, AppState};
use hvac_twin::config::Config;
use hvac_twin::streaming::TwinRuntime;

fn test_app() -> (Router, Arc<TwinRuntime>) {
    let cfg = Config::default();
    let runtime = Arc::new(TwinRuntime::start(cfg.parameters.clone(), cfg.runtime_settings()).unwrap());
    let app = router(AppState::new(cfg, Arc::clone(&runtime)));
    (app, runtime)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn wait_for_steps(runtime: &TwinRuntime, steps: usize) {
    tokio::time::timeout(Duration::from_secs(3), async {
        while runtime.history().len() < steps {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("producer did not step in time");
}

#[tokio::test]
async fn snapshot_is_null_before_first_step() {
    let (app, runtime) = test_app();

    let (status, body) = send(&app, Method::GET, "/api/v1/snapshot", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["has_data"], false);
    assert!(body["data"]["latest"].is_null());

    runtime.shutdown().await;
}

#[tokio::test]
async fn posted_sensor_event_becomes_a_step() {
    let (app, runtime) = test_app();

    let payload = json!({"T_out": 30.0, "N_occ": 10, "T_set": 24.0, "I_sol": 500.0});
    let (status, body) = send(&app, Method::POST, "/api/v1/sensor", Some(payload)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["queued"], true);

    wait_for_steps(&runtime, 1).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/snapshot", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["has_data"], true);
    let latest = &body["data"]["latest"];
    assert_eq!(latest["step"], 1);
    assert_eq!(latest["occupants"], 10);
    // Initial zone at 18 °C against a 24 °C setpoint: heating
    assert_eq!(latest["hvac_mode"], "heating");

    let (status, body) = send(&app, Method::GET, "/api/v1/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["events"]["accepted"], 1);
    assert_eq!(body["data"]["summary"]["samples"], 1);
    assert_eq!(body["data"]["producer_running"], true);

    runtime.shutdown().await;
}

#[tokio::test]
async fn malformed_sensor_event_is_dropped_by_producer() {
    let (app, runtime) = test_app();

    let (status, _) = send(&app, Method::POST, "/api/v1/sensor", Some(json!({"T_out": 30.0}))).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    tokio::time::timeout(Duration::from_secs(3), async {
        while runtime.stats().rejected == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
    assert!(runtime.history().is_empty());

    let (status, _) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);

    runtime.shutdown().await;
}

#[tokio::test]
async fn history_honours_limit() {
    let (app, runtime) = test_app();

    for t_out in [26.0, 27.0, 28.0] {
        let payload = json!({"T_out": t_out, "N_occ": 2, "T_set": 24.0});
        send(&app, Method::POST, "/api/v1/sensor", Some(payload)).await;
    }
    wait_for_steps(&runtime, 3).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["total_count"], 3);

    let (status, body) = send(&app, Method::GET, "/api/v1/history?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let steps: Vec<u64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["step"].as_u64().unwrap())
        .collect();
    assert_eq!(steps, vec![2, 3]);

    let (status, body) = send(&app, Method::GET, "/api/v1/history?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");

    runtime.shutdown().await;
}

#[tokio::test]
async fn setpoint_round_trip() {
    let (app, runtime) = test_app();

    let (status, body) = send(&app, Method::GET, "/api/v1/setpoint", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["t_set"], 24.0);
    assert_eq!(body["data"]["min_c"], 18.0);

    let (status, body) = send(&app, Method::PUT, "/api/v1/setpoint", Some(json!({"t_set": 22.0}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["t_set"], 22.0);
    assert_eq!(*runtime.setpoint_watch().borrow(), 22.0);

    let (status, body) = send(&app, Method::PUT, "/api/v1/setpoint", Some(json!({"t_set": 35.0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");

    let (_, body) = send(&app, Method::GET, "/api/v1/setpoint", None).await;
    assert_eq!(body["data"]["t_set"], 22.0);

    runtime.shutdown().await;
}

#[tokio::test]
async fn stopped_producer_reports_unavailable() {
    let (app, runtime) = test_app();
    runtime.shutdown().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");

    let payload = json!({"T_out": 25.0, "N_occ": 1, "T_set": 24.0});
    let (status, body) = send(&app, Method::POST, "/api/v1/sensor", Some(payload)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "ServiceUnavailable");
}
