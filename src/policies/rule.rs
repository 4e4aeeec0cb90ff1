//! # Rule-based timing policy.
//!
//! [`RuleBasedPolicy`] computes the green hold from a fixed formula:
//! a base hold, plus a term proportional to traffic volume, plus a flat
//! bonus when enough pedestrians are waiting.
//!
//! It is parameterized by:
//! - [`RuleBasedPolicy::base_secs`] the minimum green hold;
//! - [`RuleBasedPolicy::volume_divisor`] vehicles per extra second of green;
//! - [`RuleBasedPolicy::pedestrian_threshold`] waiting count that triggers the bonus;
//! - [`RuleBasedPolicy::pedestrian_bonus_secs`] the flat bonus itself.
//!
//! # Example
//! ```rust
//! use signalvisor::{RuleBasedPolicy, SensorReading, TimingPolicy};
//!
//! let policy = RuleBasedPolicy::default();
//!
//! // 220 vehicles, 14 pedestrians: 30 + 220/10 + 10 = 62s
//! let reading = SensorReading::new(220, vec![40, 55], 14);
//! let decision = policy.compute(&reading).unwrap();
//! assert_eq!(decision.as_secs_f64(), 62.0);
//!
//! // 150 vehicles, 5 pedestrians: 30 + 15 = 45s (no bonus at or below 10)
//! let reading = SensorReading::new(150, vec![40, 55], 5);
//! let decision = policy.compute(&reading).unwrap();
//! assert_eq!(decision.as_secs_f64(), 45.0);
//! ```

use crate::error::CycleError;
use crate::policies::timing::{PhaseDecision, TimingPolicy};
use crate::sensor::SensorReading;

/// Fixed-formula timing policy.
///
/// The hold for a reading is `base_secs + traffic_volume / volume_divisor`,
/// plus `pedestrian_bonus_secs` when `pedestrian_count > pedestrian_threshold`.
/// The volume term is real-valued (no integer truncation).
#[derive(Clone, Copy, Debug)]
pub struct RuleBasedPolicy {
    /// Minimum green hold in seconds.
    pub base_secs: f64,
    /// Vehicles per extra second of green (`> 0.0` required).
    pub volume_divisor: f64,
    /// Pedestrian count that must be **exceeded** to trigger the bonus.
    pub pedestrian_threshold: u32,
    /// Flat bonus in seconds once the threshold is exceeded.
    pub pedestrian_bonus_secs: f64,
}

impl Default for RuleBasedPolicy {
    /// Returns the standard intersection tuning:
    /// - `base_secs = 30.0`;
    /// - `volume_divisor = 10.0`;
    /// - `pedestrian_threshold = 10`;
    /// - `pedestrian_bonus_secs = 10.0`.
    fn default() -> Self {
        Self {
            base_secs: 30.0,
            volume_divisor: 10.0,
            pedestrian_threshold: 10,
            pedestrian_bonus_secs: 10.0,
        }
    }
}

impl TimingPolicy for RuleBasedPolicy {
    fn name(&self) -> &'static str {
        "rule"
    }

    /// Computes the green hold for the given reading.
    ///
    /// # Notes
    /// - A zero `volume_divisor` makes the volume term non-finite; the
    ///   decision constructor rejects it as `invalid_duration`.
    /// - A misconfigured negative `base_secs` can drive the total to zero or
    ///   below, which is rejected the same way. The policy itself never
    ///   panics on bad knobs.
    fn compute(&self, reading: &SensorReading) -> Result<PhaseDecision, CycleError> {
        let mut secs = self.base_secs + f64::from(reading.traffic_volume) / self.volume_divisor;
        if reading.pedestrian_count > self.pedestrian_threshold {
            secs += self.pedestrian_bonus_secs;
        }
        PhaseDecision::from_secs(secs)
    }
}
