//! # signalvisor
//!
//! **Signalvisor** is an adaptive traffic-signal control core for Rust.
//!
//! It turns a stream of intersection sensor readings into signal phase
//! timing: a pluggable policy decides how long to hold green, a background
//! cycle task holds the phases, and every cycle survives its own errors by
//! falling back to a safe default. The crate is designed as a building block
//! for intersection controllers and simulators.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌───────────────┐      ┌───────────────┐
//!   │ SensorSource  │      │ TimingPolicy  │
//!   │ (readings in) │      │ (rule/model)  │
//!   └──────┬────────┘      └──────┬────────┘
//!          ▼                      ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  SignalController (lifecycle surface)                     │
//! │  - Bus (broadcast events)                                 │
//! │  - SignalState (lock-free phase + running flag)           │
//! │  - SinkSet (fans out telemetry to sinks)                  │
//! └──────────────────────┬────────────────────────────────────┘
//!                        ▼
//!                 ┌─────────────┐
//!                 │ PhaseCycle  │  read ─► decide ─► GREEN ─► RED ─► repeat
//!                 │   (task)    │
//!                 └──┬───────┬──┘
//!                    │       │ Payloads: reading, decision
//!         Events:    │       ▼
//!         - CycleStarted   SinkSet (per-sink queues)
//!         - DecisionMade     ┌─────────┼─────────┐
//!         - FallbackApplied  ▼         ▼         ▼
//!         - PhaseChanged   worker1   worker2   workerN
//!                    │       ▼         ▼         ▼
//!                    ▼     sink1     sink2     sinkN
//! ┌───────────────────────────────┐   .send()   .send()
//! │    Bus (broadcast channel)    │
//! │ (capacity: ControllerConfig:: │
//! │        bus_capacity)          │
//! └───────────────┬───────────────┘
//!                 ▼
//!     broadcast::Receiver (observers)
//! ```
//!
//! ### Lifecycle
//! ```text
//! SignalController::start() ──► tokio::spawn ──► PhaseCycle::run()
//!
//! loop {
//!   ├─► cycle += 1, publish CycleStarted{ cycle }
//!   ├─► acquire reading (deadline + cancellation raced)
//!   │       │
//!   │       ├─ Ok(reading) ──► emit reading payload
//!   │       │      └─ policy.compute(&reading)
//!   │       │           ├─ Ok(decision) ─► emit decision payload,
//!   │       │           │                  publish DecisionMade{ hold }
//!   │       │           └─ Err ─────────► publish FallbackApplied{ label },
//!   │       │                              hold = fallback_green
//!   │       └─ Err ──► (ReadingRejected if invalid frame)
//!   │                  publish FallbackApplied, hold = fallback_green
//!   │
//!   ├─► commit GREEN ─► publish PhaseChanged ─► hold (cancellable)
//!   └─► commit RED   ─► publish PhaseChanged ─► hold red_hold (cancellable)
//!
//!   exit conditions:
//!     - stop() cancels the token (observed at loop top, acquisition, any hold)
//! }
//!
//! On exit: running = false, publish ControllerStopped (always last)
//! ```
//!
//! ## Features
//! | Area              | Description                                                             | Key types / traits                          |
//! |-------------------|-------------------------------------------------------------------------|---------------------------------------------|
//! | **Sensing**       | Validated readings from async sources; wire frames rejected at the edge.| [`SensorSource`], [`SensorReading`]         |
//! | **Policies**      | Choose the green hold per cycle: fixed formula or fitted predictor.     | [`TimingPolicy`], [`RuleBasedPolicy`], [`ModelPolicy`] |
//! | **Control**       | One supervised phase loop per signal, cancellable mid-hold.             | [`SignalController`]                        |
//! | **Telemetry**     | Best-effort payload fan-out to pluggable sinks.                         | [`TelemetrySink`], [`SinkSet`]              |
//! | **Errors**        | Typed errors for lifecycle misuse and per-cycle failures.               | [`ControlError`], [`CycleError`]            |
//! | **Configuration** | Centralize holds, deadlines and bus capacity.                           | [`ControllerConfig`]                        |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogSink`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use signalvisor::{
//!     ControllerConfig, CycleError, SensorReading, SignalController, SourceFn, SourceRef,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = ControllerConfig::default();
//!     cfg.red_hold = Duration::from_millis(50);
//!     cfg.fallback_green = Duration::from_millis(50);
//!
//!     // A source that reports a calm intersection.
//!     let source: SourceRef = SourceFn::arc("calm", || async {
//!         Ok::<_, CycleError>(SensorReading::new(40, vec![30, 35], 2))
//!     });
//!
//!     // Rule-based policy and simulated sensor are the defaults; only the
//!     // source is overridden here.
//!     let controller = SignalController::builder(cfg)
//!         .with_source(source)
//!         .build();
//!
//!     let mut events = controller.subscribe();
//!     controller.start().await?;
//!
//!     // Observe one decision, then stop mid-hold.
//!     while let Ok(ev) = events.recv().await {
//!         if ev.kind == signalvisor::EventKind::DecisionMade {
//!             break;
//!         }
//!     }
//!     controller.stop().await?;
//!     Ok(())
//! }
//! ```
mod controller;
mod error;
mod events;
mod policies;
mod sensor;
mod telemetry;

pub mod shutdown;

// ---- Public re-exports ----

pub use controller::{ControllerBuilder, ControllerConfig, Phase, SignalController};
pub use error::{ControlError, CycleError};
pub use events::{Bus, Event, EventKind};
pub use policies::{
    ArtifactError, FeatureScaler, ModelPolicy, PhaseDecision, PolicyRef, PredictorArtifact,
    RuleBasedPolicy, TimingPolicy,
};
pub use sensor::{RawReading, SensorReading, SensorSource, SimulatedSensor, SourceFn, SourceRef};
pub use telemetry::{PayloadKind, SinkError, SinkSet, TelemetryPayload, TelemetrySink};

// Optional: expose a simple built-in logging sink (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use telemetry::LogSink;
