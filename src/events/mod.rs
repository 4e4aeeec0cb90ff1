//! Controller events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the controller, the phase cycle
//! and the telemetry sink workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `SignalController` (start), `PhaseCycle` (cycle progress,
//!   phase changes, fallbacks, stop), `SinkSet` workers (overflow/panic).
//! - **Consumers**: anything holding a receiver from `SignalController::subscribe()`
//!   (tests, the CLI, operational tooling).
//!
//! See `controller/mod.rs` for the system-level wiring diagram.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
