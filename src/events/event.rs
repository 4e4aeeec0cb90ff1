//! # Events emitted by the controller and the phase cycle.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Controller lifecycle**: start/stop of the phase cycle
//! - **Cycle events**: per-cycle progress (readings, decisions, fallbacks, phase changes)
//! - **Sink events**: telemetry fan-out pathologies (overflow, panic)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the cycle
//! counter, the committed phase and hold durations.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use signalvisor::{Event, EventKind, Phase};
//!
//! let ev = Event::new(EventKind::PhaseChanged)
//!     .with_cycle(3)
//!     .with_phase(Phase::Green)
//!     .with_hold(Duration::from_secs(52));
//!
//! assert_eq!(ev.kind, EventKind::PhaseChanged);
//! assert_eq!(ev.phase, Some(Phase::Green));
//! assert_eq!(ev.hold_ms, Some(52_000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::controller::Phase;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of controller events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Controller lifecycle events ===
    /// Controller accepted a start request and spawned the phase cycle.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ControllerStarted,

    /// Phase cycle exited (stop request or cancellation observed).
    ///
    /// Emitted by the cycle task itself, after the last phase commit.
    /// No `PhaseChanged` event follows it.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ControllerStopped,

    // === Cycle events ===
    /// A new read-decide-hold cycle began.
    ///
    /// Sets:
    /// - `cycle`: cycle counter (1-based)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    CycleStarted,

    /// A raw sensor frame was rejected at the adapter boundary.
    ///
    /// Always followed by a `FallbackApplied` event for the same cycle.
    ///
    /// Sets:
    /// - `cycle`: cycle counter
    /// - `reason`: validation failure detail
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ReadingRejected,

    /// The timing policy produced a green-hold decision.
    ///
    /// Sets:
    /// - `cycle`: cycle counter
    /// - `policy`: policy name (e.g., "rule", "model")
    /// - `hold_ms`: decided green hold (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    DecisionMade,

    /// The cycle could not produce a decision and used the default hold.
    ///
    /// Sets:
    /// - `cycle`: cycle counter
    /// - `reason`: stable error label (e.g., "model_unavailable")
    /// - `hold_ms`: fallback green hold (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    FallbackApplied,

    /// The signal committed a new phase and began holding it.
    ///
    /// Sets:
    /// - `cycle`: cycle counter
    /// - `phase`: the committed phase
    /// - `hold_ms`: planned hold for this phase (ms); the actual hold may be
    ///   shorter if a stop request interrupts it
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    PhaseChanged,

    // === Sink events ===
    /// A telemetry sink dropped a payload (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: `sink=<name> reason=<full|closed>`
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SinkOverflow,

    /// A telemetry sink panicked while sending a payload.
    ///
    /// Sets:
    /// - `reason`: panic info/message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SinkPanicked,
}

/// Controller event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Cycle counter (1-based), if the event is cycle-scoped.
    pub cycle: Option<u64>,
    /// Committed phase, for `PhaseChanged`.
    pub phase: Option<Phase>,
    /// Hold duration in milliseconds (compact).
    pub hold_ms: Option<u32>,
    /// Name of the policy that produced a decision.
    pub policy: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Event classification.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
            at: SystemTime::now(),
            cycle: None,
            phase: None,
            hold_ms: None,
            policy: None,
            reason: None,
        }
    }

    /// Attaches a cycle counter.
    #[inline]
    pub fn with_cycle(mut self, cycle: u64) -> Self {
        self.cycle = Some(cycle);
        self
    }

    /// Attaches a committed phase.
    #[inline]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Attaches a hold duration (stored as milliseconds).
    #[inline]
    pub fn with_hold(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.hold_ms = Some(ms);
        self
    }

    /// Attaches a policy name.
    #[inline]
    pub fn with_policy(mut self, policy: impl Into<Arc<str>>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a sink overflow event.
    #[inline]
    pub fn sink_overflow(sink: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SinkOverflow).with_reason(format!("sink={sink} reason={reason}"))
    }

    /// Creates a sink panic event.
    #[inline]
    pub fn sink_panicked(sink: &'static str, info: String) -> Self {
        Event::new(EventKind::SinkPanicked).with_reason(format!("sink={sink} panic={info}"))
    }

    #[inline]
    pub fn is_sink_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SinkOverflow)
    }

    #[inline]
    pub fn is_sink_panic(&self) -> bool {
        matches!(self.kind, EventKind::SinkPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::new(EventKind::CycleStarted);
        let b = Event::new(EventKind::CycleStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_set_fields() {
        let ev = Event::new(EventKind::DecisionMade)
            .with_cycle(7)
            .with_policy("rule")
            .with_hold(Duration::from_millis(1500));

        assert_eq!(ev.kind, EventKind::DecisionMade);
        assert_eq!(ev.cycle, Some(7));
        assert_eq!(ev.policy.as_deref(), Some("rule"));
        assert_eq!(ev.hold_ms, Some(1500));
        assert_eq!(ev.phase, None);
    }

    #[test]
    fn hold_is_clamped_to_u32_millis() {
        let ev = Event::new(EventKind::PhaseChanged).with_hold(Duration::from_secs(u64::MAX / 2));
        assert_eq!(ev.hold_ms, Some(u32::MAX));
    }

    #[test]
    fn sink_constructors_classify() {
        let overflow = Event::sink_overflow("log", "full");
        assert!(overflow.is_sink_overflow());
        assert!(!overflow.is_sink_panic());
        assert_eq!(overflow.reason.as_deref(), Some("sink=log reason=full"));

        let panicked = Event::sink_panicked("log", "boom".to_string());
        assert!(panicked.is_sink_panic());
    }
}
