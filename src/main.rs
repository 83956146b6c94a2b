use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use hvac_twin::{api, config::Config, streaming, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::from_filename("local.env").ok();
    telemetry::init_tracing();

    let cfg = Config::load()?;

    let runtime = Arc::new(streaming::TwinRuntime::start(
        cfg.parameters.clone(),
        cfg.runtime_settings(),
    )?);

    #[cfg(feature = "sim")]
    let source_task = if cfg.sensors.synthetic {
        let source = hvac_twin::sensors::SyntheticSensorSource::new(
            cfg.sensors.source_config(),
            runtime.setpoint_watch(),
        );
        Some(source.spawn(runtime.sensor_sender(), runtime.shutdown_token()))
    } else {
        None
    };

    let logger_task = streaming::spawn_snapshot_logger(
        runtime.history(),
        Duration::from_secs(cfg.consumer.poll_interval_secs),
        runtime.shutdown_token(),
    );

    let addr = cfg.server.socket_addr()?;
    if cfg.server.host == "0.0.0.0" {
        warn!("binding to 0.0.0.0, the setpoint endpoint is reachable from the network");
    }

    let app = api::router(api::AppState::new(cfg.clone(), Arc::clone(&runtime)));

    info!(%addr, dt_seconds = cfg.simulation.dt_seconds, "starting HVAC twin");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    runtime.shutdown().await;

    #[cfg(feature = "sim")]
    if let Some(task) = source_task {
        if let Err(e) = task.await {
            warn!(error = %e, "sensor source ended abnormally");
        }
    }
    if let Err(e) = logger_task.await {
        warn!(error = %e, "snapshot logger ended abnormally");
    }

    warn!("shutdown complete");
    Ok(())
}
