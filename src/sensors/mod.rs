//! Sensor sources used when no field devices are attached.

pub mod profile;
#[cfg(feature = "sim")]
pub mod synthetic;

pub use profile::synthetic_day;
#[cfg(feature = "sim")]
pub use synthetic::{SyntheticSensorConfig, SyntheticSensorSource};
