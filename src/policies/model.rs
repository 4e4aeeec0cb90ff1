//! # Model-backed timing policy.
//!
//! [`ModelPolicy`] delegates the green hold to a fitted [`PredictorArtifact`].
//! A policy without an artifact is still a valid object: it simply fails every
//! cycle with [`CycleError::ModelUnavailable`], which the cycle loop converts
//! into the fixed fallback hold. The controller keeps running either way.

use std::sync::Arc;

use crate::error::CycleError;
use crate::policies::artifact::PredictorArtifact;
use crate::policies::timing::{PhaseDecision, TimingPolicy};
use crate::sensor::SensorReading;

/// Timing policy backed by a fitted linear predictor.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use signalvisor::{ModelPolicy, PredictorArtifact, SensorReading, TimingPolicy};
///
/// let artifact = PredictorArtifact::from_json(
///     r#"{
///         "weights": [4.0, 2.0],
///         "intercept": 40.0,
///         "scaler": { "mean": [100.0, 10.0], "scale": [50.0, 5.0] }
///     }"#,
/// ).unwrap();
///
/// let policy = ModelPolicy::new(Arc::new(artifact));
/// let reading = SensorReading::new(200, vec![60, 70], 20);
/// assert_eq!(policy.compute(&reading).unwrap().as_secs_f64(), 52.0);
/// ```
pub struct ModelPolicy {
    artifact: Option<Arc<PredictorArtifact>>,
}

impl ModelPolicy {
    /// Creates a policy over a loaded artifact.
    pub fn new(artifact: Arc<PredictorArtifact>) -> Self {
        Self {
            artifact: Some(artifact),
        }
    }

    /// Creates a policy with no predictor.
    ///
    /// Every `compute` call returns [`CycleError::ModelUnavailable`]; useful
    /// for exercising the fallback path and for deployments where the
    /// artifact is provisioned later.
    pub fn unloaded() -> Self {
        Self { artifact: None }
    }

    /// Returns the loaded artifact, if any.
    pub fn artifact(&self) -> Option<&Arc<PredictorArtifact>> {
        self.artifact.as_ref()
    }
}

impl TimingPolicy for ModelPolicy {
    fn name(&self) -> &'static str {
        "model"
    }

    fn compute(&self, reading: &SensorReading) -> Result<PhaseDecision, CycleError> {
        let artifact = self.artifact.as_ref().ok_or_else(|| CycleError::ModelUnavailable {
            reason: "no predictor artifact loaded".to_string(),
        })?;
        let secs = artifact.predict(
            f64::from(reading.traffic_volume),
            f64::from(reading.pedestrian_count),
        )?;
        PhaseDecision::from_secs(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::artifact::FeatureScaler;

    fn fitted() -> Arc<PredictorArtifact> {
        Arc::new(PredictorArtifact {
            weights: [4.0, 2.0],
            intercept: 40.0,
            scaler: FeatureScaler {
                mean: [100.0, 10.0],
                scale: [50.0, 5.0],
            },
        })
    }

    #[test]
    fn test_predicts_through_scaler() {
        let policy = ModelPolicy::new(fitted());
        let decision = policy.compute(&SensorReading::new(200, vec![], 20)).unwrap();
        assert_eq!(decision.as_secs_f64(), 52.0);
    }

    #[test]
    fn test_unloaded_is_model_unavailable() {
        let policy = ModelPolicy::unloaded();
        assert!(policy.artifact().is_none());
        let err = policy.compute(&SensorReading::new(100, vec![], 5)).unwrap_err();
        assert_eq!(err.as_label(), "model_unavailable");
    }

    #[test]
    fn test_unfitted_artifact_is_model_unavailable() {
        let policy = ModelPolicy::new(Arc::new(PredictorArtifact {
            weights: [4.0, 2.0],
            intercept: 40.0,
            scaler: FeatureScaler {
                mean: [100.0, 10.0],
                scale: [50.0, 0.0],
            },
        }));
        let err = policy.compute(&SensorReading::new(100, vec![], 5)).unwrap_err();
        assert_eq!(err.as_label(), "model_unavailable");
    }

    #[test]
    fn test_non_positive_prediction_is_invalid_duration() {
        // Weights that drive the output negative for heavy traffic.
        let policy = ModelPolicy::new(Arc::new(PredictorArtifact {
            weights: [-100.0, 0.0],
            intercept: 10.0,
            scaler: FeatureScaler {
                mean: [0.0, 0.0],
                scale: [1.0, 1.0],
            },
        }));
        let err = policy.compute(&SensorReading::new(50, vec![], 0)).unwrap_err();
        assert_eq!(err.as_label(), "invalid_duration");
    }

    #[test]
    fn test_name_is_stable() {
        assert_eq!(ModelPolicy::unloaded().name(), "model");
    }
}
