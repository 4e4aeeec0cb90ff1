//! # Sensor abstractions and readings.
//!
//! This module provides the sensing side of the controller:
//! - [`SensorReading`] - validated intersection snapshot consumed by policies
//! - [`RawReading`] - wire-shaped frame as produced by sensor hardware
//! - [`SensorSource`] - trait for implementing async reading producers
//! - [`SourceFn`] - function-based source implementation
//! - [`SourceRef`] - shared reference to a source (`Arc<dyn SensorSource>`)
//! - [`SimulatedSensor`] - randomized source for demos and tests

mod reading;
mod simulated;
mod source;
mod source_fn;

pub use reading::{RawReading, SensorReading};
pub use simulated::SimulatedSensor;
pub use source::SensorSource;
pub use source_fn::{SourceFn, SourceRef};
