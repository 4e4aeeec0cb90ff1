//! Error types used by the signalvisor controller and phase cycles.
//!
//! Two enums split the failure surface:
//!
//! - [`ControlError`]: misuse of the start/stop lifecycle, surfaced to callers.
//! - [`CycleError`]: failures while producing a single phase decision, absorbed
//!   by the cycle loop as a fallback hold.
//!
//! Both provide `as_label` / `as_message` helpers for logging/metrics, plus
//! [`CycleError::is_rejected_reading`] for the cycle's rejection reporting.

use thiserror::Error;

/// # Errors produced by the controller lifecycle.
///
/// These represent misuse of the start/stop surface, such as starting
/// a controller whose phase cycle is already running.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ControlError {
    /// `start` was called while a phase cycle is still running.
    #[error("controller is already running")]
    AlreadyRunning,

    /// `stop` was called but no phase cycle is running.
    #[error("controller is not running")]
    NotRunning,
}

impl ControlError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use signalvisor::ControlError;
    ///
    /// let err = ControlError::AlreadyRunning;
    /// assert_eq!(err.as_label(), "control_already_running");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ControlError::AlreadyRunning => "control_already_running",
            ControlError::NotRunning => "control_not_running",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ControlError::AlreadyRunning => "controller is already running".to_string(),
            ControlError::NotRunning => "controller is not running".to_string(),
        }
    }
}

/// # Errors produced while deciding a single cycle.
///
/// These represent failures on the read-decide path of one phase cycle.
/// None of them are fatal to the controller: the cycle loop reports the
/// error and falls back to the default green hold for that cycle.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CycleError {
    /// A raw sensor frame failed validation at the adapter boundary.
    #[error("invalid sensor reading: {reason}")]
    InvalidReading {
        /// What was wrong with the frame.
        reason: String,
    },

    /// The model-backed policy has no usable predictor.
    #[error("model unavailable: {reason}")]
    ModelUnavailable {
        /// Why the predictor cannot be used (missing, not fitted).
        reason: String,
    },

    /// The sensor source produced no reading (failed or timed out).
    #[error("sensor source unavailable: {reason}")]
    SourceUnavailable {
        /// The underlying failure description.
        reason: String,
    },

    /// A policy produced a duration that is not a positive finite number.
    #[error("invalid phase duration: {value}")]
    InvalidDuration {
        /// The offending value, in seconds.
        value: f64,
    },
}

impl CycleError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use signalvisor::CycleError;
    ///
    /// let err = CycleError::ModelUnavailable { reason: "no artifact".into() };
    /// assert_eq!(err.as_label(), "model_unavailable");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CycleError::InvalidReading { .. } => "invalid_reading",
            CycleError::ModelUnavailable { .. } => "model_unavailable",
            CycleError::SourceUnavailable { .. } => "source_unavailable",
            CycleError::InvalidDuration { .. } => "invalid_duration",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CycleError::InvalidReading { reason } => format!("invalid reading: {reason}"),
            CycleError::ModelUnavailable { reason } => format!("model unavailable: {reason}"),
            CycleError::SourceUnavailable { reason } => format!("source unavailable: {reason}"),
            CycleError::InvalidDuration { value } => format!("invalid duration: {value}"),
        }
    }

    /// Indicates whether the error means a sensor frame was rejected
    /// at the adapter boundary.
    ///
    /// The cycle loop uses this to report the rejection separately from
    /// the fallback it causes.
    ///
    /// # Example
    /// ```
    /// use signalvisor::CycleError;
    ///
    /// let rejected = CycleError::InvalidReading { reason: "missing traffic_volume".into() };
    /// assert!(rejected.is_rejected_reading()); // true
    ///
    /// let missing = CycleError::ModelUnavailable { reason: "no artifact".into() };
    /// assert!(!missing.is_rejected_reading()); // false
    /// ```
    pub fn is_rejected_reading(&self) -> bool {
        matches!(self, CycleError::InvalidReading { .. })
    }
}
