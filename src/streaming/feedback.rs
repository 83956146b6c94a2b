//! Control feedback path.
//!
//! A setpoint chosen downstream is relayed toward whatever produces sensor
//! events so that a later event carries it as `T_set`. Relaying never waits
//! for the producer and promises nothing about which step first sees the new
//! value.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetpointError {
    #[error("Setpoint {0} is not a finite temperature")]
    NotFinite(f64),
    #[error("Setpoint {value}°C outside allowed band {min}..={max}°C")]
    OutOfBand { value: f64, min: f64, max: f64 },
}

/// Allowed setpoint range (°C)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetpointBand {
    pub min_c: f64,
    pub max_c: f64,
}

impl Default for SetpointBand {
    fn default() -> Self {
        Self {
            min_c: 18.0,
            max_c: 28.0,
        }
    }
}

impl SetpointBand {
    pub fn check(&self, value: f64) -> Result<f64, SetpointError> {
        if !value.is_finite() {
            return Err(SetpointError::NotFinite(value));
        }
        if value < self.min_c || value > self.max_c {
            return Err(SetpointError::OutOfBand {
                value,
                min: self.min_c,
                max: self.max_c,
            });
        }
        Ok(value)
    }
}

/// Outbound control channel; the transport behind it is opaque.
#[async_trait]
pub trait SetpointRelay: Send + Sync {
    /// Hand a new setpoint to the producer side without waiting for it to be used.
    async fn relay(&self, setpoint_c: f64) -> Result<(), SetpointError>;

    /// Last setpoint accepted by the relay
    fn current(&self) -> f64;
}

/// In-process relay backed by a `watch` channel: sources always read the
/// latest value, intermediate values may be skipped.
#[derive(Debug, Clone)]
pub struct WatchSetpointRelay {
    tx: watch::Sender<f64>,
    band: SetpointBand,
}

impl WatchSetpointRelay {
    pub fn new(initial_c: f64, band: SetpointBand) -> Self {
        let (tx, _) = watch::channel(initial_c);
        Self { tx, band }
    }

    /// Receiver for a sensor source that stamps `T_set` onto its events
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.tx.subscribe()
    }

    pub fn band(&self) -> SetpointBand {
        self.band
    }
}

#[async_trait]
impl SetpointRelay for WatchSetpointRelay {
    async fn relay(&self, setpoint_c: f64) -> Result<(), SetpointError> {
        let value = self.band.check(setpoint_c)?;
        // send_replace keeps the value even when no source is subscribed yet
        let previous = self.tx.send_replace(value);
        tracing::info!(previous_c = previous, setpoint_c = value, "setpoint relayed");
        Ok(())
    }

    fn current(&self) -> f64 {
        *self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_relay_updates_subscribers() {
        let relay = WatchSetpointRelay::new(24.0, SetpointBand::default());
        let mut rx = relay.subscribe();
        assert_eq!(*rx.borrow(), 24.0);

        relay.relay(21.5).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 21.5);
        assert_eq!(relay.current(), 21.5);
    }

    #[tokio::test]
    async fn test_relay_without_subscribers_keeps_value() {
        let relay = WatchSetpointRelay::new(24.0, SetpointBand::default());
        relay.relay(26.0).await.unwrap();
        assert_eq!(*relay.subscribe().borrow(), 26.0);
    }

    #[tokio::test]
    async fn test_rejects_out_of_band() {
        let relay = WatchSetpointRelay::new(24.0, SetpointBand::default());
        assert!(matches!(
            relay.relay(35.0).await,
            Err(SetpointError::OutOfBand { .. })
        ));
        assert!(matches!(
            relay.relay(f64::NAN).await,
            Err(SetpointError::NotFinite(_))
        ));
        assert_eq!(relay.current(), 24.0);
    }

    #[tokio::test]
    async fn test_latest_value_wins() {
        let relay = WatchSetpointRelay::new(24.0, SetpointBand::default());
        let rx = relay.subscribe();
        for value in [19.0, 20.0, 27.5] {
            relay.relay(value).await.unwrap();
        }
        assert_eq!(*rx.borrow(), 27.5);
    }
}
