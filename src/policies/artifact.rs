//! # Fitted predictor artifact for the model-backed policy.
//!
//! A [`PredictorArtifact`] is the serialized outcome of an offline training
//! run: linear weights over two standardized features (traffic volume,
//! pedestrian count), an intercept, and the [`FeatureScaler`] that was fitted
//! alongside. Artifacts are stored as JSON and loaded read-only at startup.
//!
//! ## Wire format
//! ```json
//! {
//!   "weights": [4.0, 2.0],
//!   "intercept": 40.0,
//!   "scaler": { "mean": [100.0, 10.0], "scale": [50.0, 5.0] }
//! }
//! ```
//!
//! ## Rules
//! - Fitted-ness is checked **twice**: once at load time (hard
//!   [`ArtifactError::NotFitted`]) and once per prediction (soft
//!   [`CycleError::ModelUnavailable`], for artifacts built in code)
//! - Prediction itself never fails on a fitted artifact; extreme inputs
//!   produce extreme outputs and the decision constructor judges those

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CycleError;

/// Number of predictor features (traffic volume, pedestrian count).
pub const FEATURES: usize = 2;

/// # Errors produced while loading a predictor artifact.
///
/// These are construction-time failures: the CLI treats any of them as fatal
/// for the model-backed policy, before a controller ever starts.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// The artifact file could not be read.
    #[error("failed to read predictor artifact {path:?}: {source}")]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The artifact content is not valid artifact JSON.
    #[error("failed to parse predictor artifact: {source}")]
    Parse {
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The artifact parsed but its scaler was never fitted.
    #[error("predictor artifact is not fitted: {reason}")]
    NotFitted {
        /// Which component looked unfitted.
        reason: String,
    },
}

impl ArtifactError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ArtifactError::Io { .. } => "artifact_io",
            ArtifactError::Parse { .. } => "artifact_parse",
            ArtifactError::NotFitted { .. } => "artifact_not_fitted",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ArtifactError::Io { path, source } => format!("read {path:?}: {source}"),
            ArtifactError::Parse { source } => format!("parse: {source}"),
            ArtifactError::NotFitted { reason } => format!("not fitted: {reason}"),
        }
    }
}

/// Per-feature standardization fitted during training.
///
/// Transforms a raw feature vector `x` into `(x - mean) / scale`, component
/// by component. A scaler with any zero or non-finite component is considered
/// unfitted and refuses to transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    /// Per-feature means from the training set.
    pub mean: [f64; FEATURES],
    /// Per-feature standard deviations from the training set.
    pub scale: [f64; FEATURES],
}

impl FeatureScaler {
    /// Returns true if every component is finite and every scale is non-zero.
    pub fn is_fitted(&self) -> bool {
        self.mean.iter().all(|m| m.is_finite())
            && self.scale.iter().all(|s| s.is_finite() && *s != 0.0)
    }

    /// Standardizes one feature vector.
    ///
    /// Fails with [`CycleError::ModelUnavailable`] when the scaler is
    /// unfitted; a fitted scaler never fails.
    pub fn transform(&self, x: [f64; FEATURES]) -> Result<[f64; FEATURES], CycleError> {
        if !self.is_fitted() {
            return Err(CycleError::ModelUnavailable {
                reason: "feature scaler is not fitted".to_string(),
            });
        }
        let mut z = [0.0; FEATURES];
        for i in 0..FEATURES {
            z[i] = (x[i] - self.mean[i]) / self.scale[i];
        }
        Ok(z)
    }
}

/// Fitted linear predictor over standardized features.
///
/// # Example
/// ```
/// use signalvisor::PredictorArtifact;
///
/// let artifact = PredictorArtifact::from_json(
///     r#"{
///         "weights": [4.0, 2.0],
///         "intercept": 40.0,
///         "scaler": { "mean": [100.0, 10.0], "scale": [50.0, 5.0] }
///     }"#,
/// ).unwrap();
///
/// // z = [(200-100)/50, (20-10)/5] = [2, 2]; 4*2 + 2*2 + 40 = 52
/// assert_eq!(artifact.predict(200.0, 20.0).unwrap(), 52.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorArtifact {
    /// Linear weights over the standardized features.
    pub weights: [f64; FEATURES],
    /// Additive intercept, in seconds.
    pub intercept: f64,
    /// The scaler fitted alongside the weights.
    pub scaler: FeatureScaler,
}

impl PredictorArtifact {
    /// Loads an artifact from a JSON file and verifies it is fitted.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parses an artifact from a JSON string and verifies it is fitted.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let artifact: Self =
            serde_json::from_str(json).map_err(|source| ArtifactError::Parse { source })?;
        if !artifact.scaler.is_fitted() {
            return Err(ArtifactError::NotFitted {
                reason: "scaler has zero or non-finite components".to_string(),
            });
        }
        Ok(artifact)
    }

    /// Predicts a green hold (seconds) for the raw feature pair.
    ///
    /// Standardizes the features, then applies the linear form
    /// `w · z + intercept`. The output is unclamped; decision validation
    /// happens in [`PhaseDecision::from_secs`](crate::PhaseDecision::from_secs).
    pub fn predict(&self, traffic_volume: f64, pedestrian_count: f64) -> Result<f64, CycleError> {
        let z = self.scaler.transform([traffic_volume, pedestrian_count])?;
        Ok(self.weights[0] * z[0] + self.weights[1] * z[1] + self.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted_json() -> &'static str {
        r#"{
            "weights": [4.0, 2.0],
            "intercept": 40.0,
            "scaler": { "mean": [100.0, 10.0], "scale": [50.0, 5.0] }
        }"#
    }

    #[test]
    fn test_parse_and_predict() {
        let artifact = PredictorArtifact::from_json(fitted_json()).unwrap();
        assert_eq!(artifact.predict(200.0, 20.0).unwrap(), 52.0);
        // At the training mean the prediction is just the intercept.
        assert_eq!(artifact.predict(100.0, 10.0).unwrap(), 40.0);
    }

    #[test]
    fn test_zero_scale_is_not_fitted() {
        let json = r#"{
            "weights": [4.0, 2.0],
            "intercept": 40.0,
            "scaler": { "mean": [100.0, 10.0], "scale": [0.0, 5.0] }
        }"#;
        let err = PredictorArtifact::from_json(json).unwrap_err();
        assert_eq!(err.as_label(), "artifact_not_fitted");
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = PredictorArtifact::from_json("{ not json").unwrap_err();
        assert_eq!(err.as_label(), "artifact_parse");
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let err = PredictorArtifact::from_json(r#"{ "weights": [1.0, 2.0] }"#).unwrap_err();
        assert_eq!(err.as_label(), "artifact_parse");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = PredictorArtifact::load(Path::new("/nonexistent/predictor.json")).unwrap_err();
        assert_eq!(err.as_label(), "artifact_io");
    }

    #[test]
    fn test_unfitted_scaler_refuses_transform() {
        let scaler = FeatureScaler {
            mean: [0.0, 0.0],
            scale: [1.0, 0.0],
        };
        assert!(!scaler.is_fitted());
        let err = scaler.transform([1.0, 2.0]).unwrap_err();
        assert_eq!(err.as_label(), "model_unavailable");
    }

    #[test]
    fn test_artifact_round_trips_through_json() {
        let artifact = PredictorArtifact::from_json(fitted_json()).unwrap();
        let encoded = serde_json::to_string(&artifact).unwrap();
        let decoded = PredictorArtifact::from_json(&encoded).unwrap();
        assert_eq!(artifact, decoded);
    }
}
