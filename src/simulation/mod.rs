//! # Zone Simulation Module
//!
//! Lumped-parameter model of a single conditioned zone.
//!
//! ## Components
//!
//! - **Physics**: pure right-hand side of the two-node RC thermal network, the
//!   CO₂ mass balance and the HVAC power draw
//! - **Integrator**: owns the state vector and energy meter, advances them by
//!   fixed forward-Euler steps
//! - **Batch**: runs the integrator over a prepared series, with one-hour
//!   lookahead and hourly energy totals
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use hvac_twin::domain::{ParameterSet, SensorEvent, StateVector};
//! use hvac_twin::simulation::ZoneIntegrator;
//!
//! let params = Arc::new(ParameterSet::default());
//! let mut sim = ZoneIntegrator::new(params, StateVector::new(18.0, 19.0, 600.0), 300.0)?;
//!
//! let result = sim.step(&SensorEvent::new(25.0, 5, 24.0), chrono::Utc::now());
//! assert!(result.zone_temp_c > 18.0);
//! # Ok::<(), hvac_twin::domain::ParameterError>(())
//! ```

pub mod batch;
pub mod integrator;
pub mod physics;

pub use batch::{hourly_energy, run_series, HourlyEnergy, SeriesRecord};
pub use integrator::ZoneIntegrator;
pub use physics::{derivatives, hvac_power, Derivatives, HvacLoad};
