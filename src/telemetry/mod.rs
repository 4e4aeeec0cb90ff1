//! # Telemetry sinks for the signalvisor controller.
//!
//! This module provides the [`TelemetrySink`] trait, the [`TelemetryPayload`]
//! field-map type, and the [`SinkSet`] fan-out that decouples sinks from the
//! phase cycle.
//!
//! ## Architecture
//! ```text
//! Payload flow:
//!   PhaseCycle ── emit(&TelemetryPayload) ──► SinkSet
//!                                               │
//!                                          ┌────┴────┬─────────┐
//!                                          ▼         ▼         ▼
//!                                       LogSink   Uplink    Custom ...
//!                                       (queue)   (queue)   (queue)
//! ```
//!
//! Each sink gets a bounded queue and a worker task; a slow or broken sink
//! drops its own payloads and never stalls the signal.

mod payload;
mod set;
mod sink;

#[cfg(feature = "logging")]
mod log;

pub use payload::{PayloadKind, TelemetryPayload};
pub use set::SinkSet;
pub use sink::{SinkError, TelemetrySink};

#[cfg(feature = "logging")]
pub use log::LogSink;
