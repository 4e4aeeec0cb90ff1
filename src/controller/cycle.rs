//! # PhaseCycle: the read-decide-hold loop of one signal.
//!
//! Runs one intersection's signal as a sequence of cycles:
//! acquire a reading, compute (or fall back to) a green hold, hold green,
//! hold red, repeat. Cooperative cancellation via [`CancellationToken`].
//!
//! ## Event flow
//! For each cycle, the task publishes:
//! ```text
//! CycleStarted → DecisionMade               (policy produced a hold)
//!              → ReadingRejected? → FallbackApplied   (no decision this cycle)
//!              → PhaseChanged(GREEN) → [hold] → PhaseChanged(RED) → [hold]
//!
//! On cancellation (from any wait point):
//!   → ControllerStopped (always the final event)
//! ```
//!
//! ## Architecture
//! ```text
//! SignalController::start() ──► tokio::spawn ──► PhaseCycle::run()
//!
//! loop {
//!   ├─► check cancellation
//!   ├─► publish CycleStarted
//!   ├─► acquire() ───► source.next_reading()  (raced vs deadline + cancel)
//!   │       │
//!   │       ├─► Ok(reading) ──► emit reading payload
//!   │       │        └─► policy.compute()
//!   │       │              ├─► Ok(decision) ──► emit decision payload, publish DecisionMade
//!   │       │              └─► Err ──► publish FallbackApplied, use fallback hold
//!   │       └─► Err ──► (ReadingRejected?) publish FallbackApplied, use fallback hold
//!   ├─► commit GREEN, hold (interruptible)
//!   └─► commit RED, hold (interruptible)
//! }
//! state.running = false; publish ControllerStopped
//! ```
//!
//! ## Rules
//! - Cycles run **sequentially**; one decision, one green, one red per cycle
//! - Per-cycle errors **never** kill the loop; they cost one fallback hold
//! - Every hold is **interruptible**: a stop request takes effect within
//!   milliseconds, never after the current hold finishes
//! - The final `ControllerStopped` event is published by this task, after the
//!   last phase commit, so observers can rely on event order

use std::sync::Arc;
use std::time::Duration;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::controller::config::ControllerConfig;
use crate::controller::state::{Phase, SignalState};
use crate::error::CycleError;
use crate::events::{Bus, Event, EventKind};
use crate::policies::PolicyRef;
use crate::sensor::{SensorReading, SourceRef};
use crate::telemetry::{SinkSet, TelemetryPayload};

/// Outcome of one sensor acquisition attempt.
enum Acquired {
    /// A validated reading arrived in time.
    Reading(SensorReading),
    /// The source failed, timed out, or emitted an invalid frame.
    Failed(CycleError),
    /// Cancellation arrived while waiting.
    Cancelled,
}

/// The signal's phase loop, spawned by [`SignalController::start`](crate::SignalController::start).
///
/// ### Responsibilities
/// - **Timing**: holds each phase for its decided/configured duration
/// - **Resilience**: converts every per-cycle error into one fallback hold
/// - **State publication**: commits phases to [`SignalState`] before holding
/// - **Observability**: reports progress on the bus, payloads to the sinks
pub(crate) struct PhaseCycle {
    pub(crate) cfg: ControllerConfig,
    pub(crate) policy: PolicyRef,
    pub(crate) source: SourceRef,
    pub(crate) sinks: Arc<SinkSet>,
    pub(crate) bus: Bus,
    pub(crate) state: Arc<SignalState>,
}

impl PhaseCycle {
    /// Runs the loop until cancellation.
    ///
    /// ### Cancellation semantics
    /// `token` is checked at **safe points** only:
    /// - At the top of each cycle
    /// - During sensor acquisition (cancellable wait)
    /// - During every phase hold (cancellable sleep)
    ///
    /// A commit-then-hold pair is never split: once a phase is committed, the
    /// hold begins immediately; cancellation during the hold leaves the signal
    /// in that committed phase.
    pub(crate) async fn run(self, token: CancellationToken) {
        let mut cycle: u64 = 0;

        loop {
            if token.is_cancelled() {
                break;
            }
            cycle += 1;
            self.bus
                .publish(Event::new(EventKind::CycleStarted).with_cycle(cycle));

            let green_hold = match self.acquire(&token).await {
                Acquired::Cancelled => break,
                Acquired::Reading(reading) => {
                    self.sinks.emit(&TelemetryPayload::reading(&reading));
                    match self.policy.compute(&reading) {
                        Ok(decision) => {
                            self.sinks.emit(&TelemetryPayload::decision(
                                &decision,
                                self.policy.name(),
                                cycle,
                            ));
                            self.bus.publish(
                                Event::new(EventKind::DecisionMade)
                                    .with_cycle(cycle)
                                    .with_policy(self.policy.name())
                                    .with_hold(decision.duration()),
                            );
                            decision.duration()
                        }
                        Err(e) => self.fall_back(cycle, &e),
                    }
                }
                Acquired::Failed(e) => {
                    if e.is_rejected_reading() {
                        self.bus.publish(
                            Event::new(EventKind::ReadingRejected)
                                .with_cycle(cycle)
                                .with_reason(e.as_message()),
                        );
                    }
                    self.fall_back(cycle, &e)
                }
            };

            self.commit(cycle, Phase::Green, green_hold);
            if !self.hold(&token, green_hold).await {
                break;
            }

            self.commit(cycle, Phase::Red, self.cfg.red_hold);
            if !self.hold(&token, self.cfg.red_hold).await {
                break;
            }
        }

        self.state.set_running(false);
        self.bus.publish(Event::new(EventKind::ControllerStopped));
    }

    /// Waits for one reading, racing the source against cancellation.
    async fn acquire(&self, token: &CancellationToken) -> Acquired {
        select! {
            _ = token.cancelled() => Acquired::Cancelled,
            res = self.next_with_deadline() => match res {
                Ok(reading) => Acquired::Reading(reading),
                Err(e) => Acquired::Failed(e),
            },
        }
    }

    /// Asks the source for a reading, within the configured deadline (if any).
    async fn next_with_deadline(&self) -> Result<SensorReading, CycleError> {
        match self.cfg.acquisition_timeout() {
            Some(deadline) => match time::timeout(deadline, self.source.next_reading()).await {
                Ok(res) => res,
                Err(_elapsed) => Err(CycleError::SourceUnavailable {
                    reason: format!("no reading within {deadline:?}"),
                }),
            },
            None => self.source.next_reading().await,
        }
    }

    /// Reports a failed cycle and returns the fallback green hold.
    fn fall_back(&self, cycle: u64, err: &CycleError) -> Duration {
        self.bus.publish(
            Event::new(EventKind::FallbackApplied)
                .with_cycle(cycle)
                .with_reason(err.as_label())
                .with_hold(self.cfg.fallback_green),
        );
        self.cfg.fallback_green
    }

    /// Commits a phase to shared state, then announces it.
    fn commit(&self, cycle: u64, phase: Phase, hold: Duration) {
        self.state.set_phase(phase);
        self.bus.publish(
            Event::new(EventKind::PhaseChanged)
                .with_cycle(cycle)
                .with_phase(phase)
                .with_hold(hold),
        );
    }

    /// Holds the current phase. Returns `false` if cancellation cut it short.
    async fn hold(&self, token: &CancellationToken, duration: Duration) -> bool {
        let sleep = time::sleep(duration);
        tokio::pin!(sleep);
        select! {
            _ = &mut sleep => true,
            _ = token.cancelled() => false,
        }
    }
}
