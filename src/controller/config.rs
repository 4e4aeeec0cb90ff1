//! # Controller configuration.
//!
//! Provides [`ControllerConfig`] centralized settings for one signal controller.
//!
//! ## Sentinel values
//! - `source_timeout = 0s` → no acquisition deadline (wait on the source forever)

use std::time::Duration;

/// Configuration for a signal controller.
///
/// Defines:
/// - **Phase timing**: fixed red hold, fallback green hold
/// - **Acquisition**: per-cycle sensor deadline
/// - **Event system**: bus capacity for event delivery
///
/// ## Field semantics
/// - `red_hold`: Fixed red phase duration each cycle
/// - `fallback_green`: Green hold used when a cycle cannot produce a decision
/// - `source_timeout`: Per-cycle sensor acquisition deadline (`0s` = no deadline)
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Fixed duration of the red phase after every green hold.
    pub red_hold: Duration,

    /// Green hold applied when a cycle fails to produce a decision.
    ///
    /// Any per-cycle error (source down, invalid frame, unavailable model,
    /// invalid duration) resolves to this hold for that one cycle.
    pub fallback_green: Duration,

    /// Maximum time to wait for one sensor acquisition.
    ///
    /// - `Duration::ZERO` = no deadline (wait until the source answers)
    /// - `> 0` = a slower acquisition counts as source-unavailable for that cycle
    pub source_timeout: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items. Minimum value is 1 (enforced by Bus).
    pub bus_capacity: usize,
}

impl ControllerConfig {
    /// Returns the sensor acquisition deadline as an `Option`.
    ///
    /// - `None` → no deadline
    /// - `Some(d)` → deadline applied per acquisition
    #[inline]
    pub fn acquisition_timeout(&self) -> Option<Duration> {
        if self.source_timeout == Duration::ZERO {
            None
        } else {
            Some(self.source_timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    ///
    /// The `Bus` should use this value to avoid constructing an invalid channel.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for ControllerConfig {
    /// Default configuration:
    ///
    /// - `red_hold = 5s` (standard clearance interval)
    /// - `fallback_green = 30s` (same floor as the rule-based base hold)
    /// - `source_timeout = 2s` (a sensor slower than this is treated as down)
    /// - `bus_capacity = 1024` (good baseline)
    fn default() -> Self {
        Self {
            red_hold: Duration::from_secs(5),
            fallback_green: Duration::from_secs(30),
            source_timeout: Duration::from_secs(2),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_source_timeout_means_no_deadline() {
        let cfg = ControllerConfig {
            source_timeout: Duration::ZERO,
            ..ControllerConfig::default()
        };
        assert_eq!(cfg.acquisition_timeout(), None);
        assert_eq!(
            ControllerConfig::default().acquisition_timeout(),
            Some(Duration::from_secs(2))
        );
    }

    #[test]
    fn bus_capacity_clamps_to_one() {
        let cfg = ControllerConfig {
            bus_capacity: 0,
            ..ControllerConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
