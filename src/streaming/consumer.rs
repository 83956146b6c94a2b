use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::history::History;

/// Poll the latest snapshot on a fixed timer and log it.
///
/// The history lock is held only while copying the latest entry out.
pub fn spawn_snapshot_logger(
    history: Arc<History>,
    poll_every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(poll_every.max(Duration::from_millis(100)));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut last_logged = 0;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {}
            }

            let Some(latest) = history.latest() else {
                continue;
            };
            if latest.step == last_logged {
                continue;
            }
            last_logged = latest.step;

            info!(
                step = latest.step,
                zone_temp_c = latest.zone_temp_c,
                setpoint_c = latest.setpoint_c,
                co2_ppm = latest.co2_ppm,
                power_kw = latest.power_kw,
                energy_kwh = latest.cumulative_energy_kwh,
                occupants = latest.occupants,
                "current state"
            );
        }
    })
}
