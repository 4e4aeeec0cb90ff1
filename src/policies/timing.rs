//! # Timing policy abstraction and the phase decision type.
//!
//! This module defines the [`TimingPolicy`] trait (pure, synchronous) and the
//! [`PhaseDecision`] it produces. The common handle type is [`PolicyRef`], an
//! `Arc<dyn TimingPolicy>` suitable for sharing with the cycle task.
//!
//! ## Rules
//! - `compute` is a pure function of the reading: no I/O, no clocks, no state
//! - Every decision carries a **positive, finite** duration; there is no way
//!   to construct one otherwise
//! - A policy that cannot decide returns a [`CycleError`]; the cycle loop
//!   turns that into a fallback hold, never a crash

use std::sync::Arc;
use std::time::Duration;

use crate::error::CycleError;
use crate::sensor::SensorReading;

/// Shared reference to a timing policy.
pub type PolicyRef = Arc<dyn TimingPolicy>;

/// # Strategy for choosing the green hold of one cycle.
///
/// A `TimingPolicy` has a stable [`name`](TimingPolicy::name) (attached to
/// decision events and telemetry) and a [`compute`](TimingPolicy::compute)
/// method mapping one validated reading to one [`PhaseDecision`].
///
/// # Example
/// ```
/// use signalvisor::{CycleError, PhaseDecision, SensorReading, TimingPolicy};
///
/// struct FlatMinute;
///
/// impl TimingPolicy for FlatMinute {
///     fn name(&self) -> &'static str { "flat-minute" }
///
///     fn compute(&self, _reading: &SensorReading) -> Result<PhaseDecision, CycleError> {
///         PhaseDecision::from_secs(60.0)
///     }
/// }
/// ```
pub trait TimingPolicy: Send + Sync + 'static {
    /// Returns a stable, human-readable policy name.
    fn name(&self) -> &'static str;

    /// Computes the green hold for the given reading.
    fn compute(&self, reading: &SensorReading) -> Result<PhaseDecision, CycleError>;
}

/// Validated green-hold decision.
///
/// Wraps a [`Duration`] that is guaranteed positive and finite. The only way
/// in is [`PhaseDecision::from_secs`], which rejects everything else, so the
/// cycle task can hold a decision without re-checking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDecision {
    duration: Duration,
}

impl PhaseDecision {
    /// Creates a decision from a duration in seconds.
    ///
    /// Rejects NaN, infinities, zero, negatives and values too large to
    /// represent as a [`Duration`], all as [`CycleError::InvalidDuration`].
    ///
    /// # Example
    /// ```
    /// use signalvisor::PhaseDecision;
    ///
    /// let d = PhaseDecision::from_secs(52.0).unwrap();
    /// assert_eq!(d.as_secs_f64(), 52.0);
    ///
    /// assert!(PhaseDecision::from_secs(0.0).is_err());
    /// assert!(PhaseDecision::from_secs(f64::NAN).is_err());
    /// ```
    pub fn from_secs(secs: f64) -> Result<Self, CycleError> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(CycleError::InvalidDuration { value: secs });
        }
        let duration = Duration::try_from_secs_f64(secs)
            .map_err(|_| CycleError::InvalidDuration { value: secs })?;
        if duration.is_zero() {
            // Subnormal inputs can round down to zero nanoseconds.
            return Err(CycleError::InvalidDuration { value: secs });
        }
        Ok(Self { duration })
    }

    /// Returns the decided green hold.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns the decided green hold in seconds.
    #[inline]
    pub fn as_secs_f64(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_positive_finite() {
        let d = PhaseDecision::from_secs(42.5).unwrap();
        assert_eq!(d.duration(), Duration::from_millis(42_500));
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        assert!(PhaseDecision::from_secs(0.0).is_err());
        assert!(PhaseDecision::from_secs(-1.0).is_err());
        assert!(PhaseDecision::from_secs(-0.0).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = PhaseDecision::from_secs(bad).unwrap_err();
            assert_eq!(err.as_label(), "invalid_duration");
        }
    }

    #[test]
    fn test_rejects_overflowing_duration() {
        assert!(PhaseDecision::from_secs(1e300).is_err());
    }

    #[test]
    fn test_rejects_subnormal_rounding_to_zero() {
        assert!(PhaseDecision::from_secs(1e-300).is_err());
    }
}
