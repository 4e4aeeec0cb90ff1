//! # Core telemetry sink trait
//!
//! `TelemetrySink` is the extension point for shipping controller telemetry to
//! the outside world. Each sink is driven by a dedicated worker loop fed by a
//! bounded queue that is owned by the [`SinkSet`](crate::SinkSet).
//!
//! ## Contract
//! - Implementations may be slow (network I/O, batching, retries); they do
//!   **not** block the phase cycle nor other sinks.
//! - Delivery is best-effort: a failed `send` is logged and the payload is
//!   gone. Nothing on the control path waits for telemetry.
//! - Each sink **declares** its preferred queue capacity via
//!   [`TelemetrySink::queue_capacity`]. If a queue overflows, payloads for
//!   that sink are **dropped** (warn + bus event).
//!
//! ## Example (skeleton)
//! ```rust
//! use async_trait::async_trait;
//! use signalvisor::{SinkError, TelemetryPayload, TelemetrySink};
//!
//! struct Uplink;
//!
//! #[async_trait]
//! impl TelemetrySink for Uplink {
//!     async fn send(&self, payload: &TelemetryPayload) -> Result<(), SinkError> {
//!         // POST payload.fields() somewhere...
//!         let _ = payload;
//!         Ok(())
//!     }
//!     fn name(&self) -> &'static str { "uplink" }
//!     fn queue_capacity(&self) -> usize { 512 }
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::telemetry::payload::TelemetryPayload;

/// # Errors produced by telemetry sinks.
///
/// Sink errors never propagate to the phase cycle; the worker logs them
/// and moves on to the next payload.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SinkError {
    /// The endpoint received the payload but refused it.
    #[error("telemetry endpoint rejected payload: {reason}")]
    Rejected {
        /// The endpoint's complaint.
        reason: String,
    },

    /// The endpoint could not be reached at all.
    #[error("telemetry endpoint unreachable: {reason}")]
    Unreachable {
        /// The underlying failure description.
        reason: String,
    },
}

/// Contract for telemetry sinks.
///
/// Called from a sink-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait TelemetrySink: Send + Sync + 'static {
    /// Ships a single payload to this sink's destination.
    ///
    /// # Parameters
    /// - `payload`: Reference to the payload (does not transfer ownership)
    async fn send(&self, payload: &TelemetryPayload) -> Result<(), SinkError>;

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this sink's queue.
    ///
    /// On overflow, payloads for this sink are **dropped** (warn + bus event).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
