//! Single-zone HVAC digital twin.
//!
//! A two-node RC thermal model with a CO₂ balance and an HVAC power
//! estimate, stepped once per incoming sensor event. Results land in a
//! bounded history that readers poll independently of the event rate.

pub mod api;
pub mod config;
pub mod domain;
pub mod sensors;
pub mod simulation;
pub mod streaming;
pub mod telemetry;
