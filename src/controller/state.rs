//! # Observable signal state shared between the controller and the cycle task.
//!
//! Maintains the currently displayed phase and the running flag, readable
//! from any thread without locking.
//!
//! ## Architecture
//! ```text
//! PhaseCycle ──► SignalState::set_phase() ──► AtomicU8
//!                                                 │
//! SignalController::current_phase() ◄─────────────┘
//!       (any thread, lock-free read)
//! ```
//!
//! ## Rules
//! - Only the cycle task writes `phase`; it commits the new phase **before**
//!   starting to hold it
//! - `running` flips to true on start, and back to false by the cycle task
//!   itself right before it exits
//! - Reads are `Acquire`, writes are `Release`: a reader that observes a
//!   phase also observes everything the cycle published before committing it

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Displayed state of the traffic signal.
///
/// The controller's cycle only ever commits `Green` and `Red`; `Yellow`
/// exists for sensor frames that report an observed light state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Stop indication. Initial phase of every controller.
    Red = 0,
    /// Go indication, held for the decided duration.
    Green = 1,
    /// Clearance indication (reported by sensors, never committed).
    Yellow = 2,
}

impl Phase {
    /// Returns the canonical uppercase name (`"RED"`, `"GREEN"`, `"YELLOW"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Red => "RED",
            Phase::Green => "GREEN",
            Phase::Yellow => "YELLOW",
        }
    }

    /// Parses a canonical phase name. Case-sensitive; anything else is `None`.
    pub fn parse(s: &str) -> Option<Phase> {
        match s {
            "RED" => Some(Phase::Red),
            "GREEN" => Some(Phase::Green),
            "YELLOW" => Some(Phase::Yellow),
            _ => None,
        }
    }

    fn from_u8(v: u8) -> Phase {
        match v {
            1 => Phase::Green,
            2 => Phase::Yellow,
            _ => Phase::Red,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lock-free snapshot of the controller's externally visible state.
///
/// ### Responsibilities
/// - Answers `current_phase()` / `is_running()` without touching the cycle task
/// - Survives the cycle task: after stop, the last committed phase stays readable
pub(crate) struct SignalState {
    phase: AtomicU8,
    running: AtomicBool,
}

impl SignalState {
    /// Creates a fresh state: phase `Red`, not running.
    pub(crate) fn new() -> Self {
        Self {
            phase: AtomicU8::new(Phase::Red as u8),
            running: AtomicBool::new(false),
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    pub(crate) fn set_phase(&self, phase: Phase) {
        self.phase.store(phase as u8, Ordering::Release);
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_red_and_stopped() {
        let state = SignalState::new();
        assert_eq!(state.phase(), Phase::Red);
        assert!(!state.is_running());
    }

    #[test]
    fn phase_round_trips_through_storage() {
        let state = SignalState::new();
        for phase in [Phase::Green, Phase::Yellow, Phase::Red] {
            state.set_phase(phase);
            assert_eq!(state.phase(), phase);
        }
    }

    #[test]
    fn parse_accepts_canonical_names_only() {
        assert_eq!(Phase::parse("RED"), Some(Phase::Red));
        assert_eq!(Phase::parse("GREEN"), Some(Phase::Green));
        assert_eq!(Phase::parse("YELLOW"), Some(Phase::Yellow));
        assert_eq!(Phase::parse("green"), None);
        assert_eq!(Phase::parse("BLUE"), None);
        assert_eq!(Phase::parse(""), None);
    }

    #[test]
    fn display_matches_canonical_name() {
        assert_eq!(Phase::Green.to_string(), "GREEN");
        assert_eq!(Phase::parse(&Phase::Yellow.to_string()), Some(Phase::Yellow));
    }
}
