//! # Sensor source abstraction.
//!
//! This module defines the [`SensorSource`] trait: an async producer of
//! intersection readings. The common handle type is [`SourceRef`](crate::SourceRef),
//! an `Arc<dyn SensorSource>` suitable for sharing with the cycle task.
//!
//! A source may block briefly (hardware polling, I/O); the cycle task races
//! each acquisition against cancellation and an optional timeout, so sources
//! do not need to handle either themselves.

use async_trait::async_trait;

use crate::error::CycleError;
use crate::sensor::reading::SensorReading;

/// # Asynchronous producer of sensor readings.
///
/// A `SensorSource` has a stable [`name`](SensorSource::name) and an async
/// [`next_reading`](SensorSource::next_reading) method that yields one validated
/// reading per call. Sources own their validation: whatever they emit must
/// already have passed the adapter boundary.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use signalvisor::{CycleError, SensorReading, SensorSource};
///
/// struct Fixed;
///
/// #[async_trait]
/// impl SensorSource for Fixed {
///     fn name(&self) -> &str { "fixed" }
///
///     async fn next_reading(&self) -> Result<SensorReading, CycleError> {
///         Ok(SensorReading::new(100, vec![50, 60], 3))
///     }
/// }
/// ```
#[async_trait]
pub trait SensorSource: Send + Sync + 'static {
    /// Returns a stable, human-readable source name.
    fn name(&self) -> &str;

    /// Produces the next reading.
    ///
    /// Errors are per-call: the cycle treats a failed acquisition as
    /// [`CycleError::SourceUnavailable`] territory and falls back for that
    /// cycle only, then asks again on the next one.
    async fn next_reading(&self) -> Result<SensorReading, CycleError>;
}
