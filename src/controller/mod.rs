//! # Signal controller: lifecycle, configuration and the phase cycle.
//!
//! This module wires one intersection signal together. The controller owns
//! the moving parts; the cycle task does the work; shared state answers
//! queries without locks.
//!
//! ## System wiring
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │               SignalController               │
//!                 │  start()/stop()   current_phase()/is_running │
//!                 └──────┬───────────────────────▲───────────────┘
//!                        │ spawn/cancel          │ Acquire loads
//!                        ▼                       │
//!                  ┌───────────┐          ┌─────────────┐
//!   SensorSource ─►│ PhaseCycle│─commits─►│ SignalState │
//!                  │  (task)   │          └─────────────┘
//!   TimingPolicy ─►│           │─payloads─► SinkSet ─► TelemetrySink(s)
//!                  └─────┬─────┘
//!                        │ events
//!                        ▼
//!                       Bus ─► broadcast::Receiver (observers)
//! ```
//!
//! ## Contents
//! - [`SignalController`] lifecycle surface (start/stop/query/subscribe)
//! - [`ControllerBuilder`] assembly with optional sinks and defaults
//! - [`ControllerConfig`] holds, deadlines and bus capacity
//! - [`Phase`] the displayed signal state

mod builder;
mod config;
mod core;
mod cycle;
mod state;

pub use builder::ControllerBuilder;
pub use config::ControllerConfig;
pub use core::SignalController;
pub use state::Phase;
