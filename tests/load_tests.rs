//! Readers polling the history while the producer is busy.
//!
//! Every snapshot a reader takes must be a consistent, ordered window no
//! larger than the configured capacity.

use std::time::{Duration, Instant};
use tokio::task::JoinSet;

use hvac_twin::domain::{ParameterSet, SensorEvent};
use hvac_twin::streaming::{encode_event, RuntimeSettings, TwinRuntime};

const EVENTS: u64 = 2_000;
const READERS: usize = 16;
const CAPACITY: usize = 48;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_readers_see_consistent_windows() {
    let settings = RuntimeSettings {
        history_capacity: CAPACITY,
        channel_capacity: 256,
        ..Default::default()
    };
    let runtime = TwinRuntime::start(ParameterSet::default(), settings).unwrap();
    let history = runtime.history();

    let mut readers = JoinSet::new();
    for _ in 0..READERS {
        let history = runtime.history();
        readers.spawn(async move {
            let mut snapshots = 0usize;
            let mut last_seen = 0u64;
            let deadline = Instant::now() + Duration::from_secs(10);
            while last_seen < EVENTS && Instant::now() < deadline {
                let window = history.snapshot();
                assert!(window.len() <= CAPACITY);
                assert!(window.windows(2).all(|w| w[1].step == w[0].step + 1));
                if let Some(latest) = window.last() {
                    // Readers never observe the window moving backwards
                    assert!(latest.step >= last_seen);
                    last_seen = latest.step;
                }
                snapshots += 1;
                tokio::task::yield_now().await;
            }
            snapshots
        });
    }

    let tx = runtime.sensor_sender();
    let started = Instant::now();
    for i in 0..EVENTS {
        let event = SensorEvent::new(20.0 + (i % 15) as f64, (i % 12) as u32, 24.0);
        tx.send(encode_event(&event)).await.unwrap();
    }

    let mut total_snapshots = 0;
    while let Some(result) = readers.join_next().await {
        total_snapshots += result.unwrap();
    }
    let elapsed = started.elapsed();

    assert_eq!(runtime.stats().accepted, EVENTS);
    assert_eq!(history.len(), CAPACITY);
    assert_eq!(history.latest().map(|r| r.step), Some(EVENTS));
    assert!(total_snapshots >= READERS);
    println!("{EVENTS} events, {total_snapshots} snapshots in {elapsed:?}");

    runtime.shutdown().await;
}
