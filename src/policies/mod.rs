//! Timing policies.
//!
//! This module groups the knobs that control **how long** the green phase
//! is held each cycle, and the decision type that carries the answer.
//!
//! ## Contents
//! - [`TimingPolicy`] trait for computing a green hold from a reading
//! - [`PhaseDecision`] validated positive, finite hold duration
//! - [`RuleBasedPolicy`] fixed-formula policy (base + volume term + pedestrian bonus)
//! - [`ModelPolicy`] policy backed by a fitted linear predictor
//! - [`PredictorArtifact`], [`FeatureScaler`] the predictor and its standardization
//!
//! ## Quick wiring
//! ```text
//! SignalController { policy: PolicyRef, ... }
//!      └─► controller::cycle::PhaseCycle uses:
//!           - policy.compute(&reading) each cycle for the green hold
//!           - any Err(CycleError) triggers the fixed fallback hold
//! ```
//!
//! ## Defaults
//! - `RuleBasedPolicy::default()` → base=30s, volume divisor=10, pedestrian bonus=10s over 10 waiting.
//! - `ModelPolicy` has no default: it requires a loaded [`PredictorArtifact`].

mod artifact;
mod model;
mod rule;
mod timing;

pub use artifact::{ArtifactError, FeatureScaler, PredictorArtifact};
pub use model::ModelPolicy;
pub use rule::RuleBasedPolicy;
pub use timing::{PhaseDecision, PolicyRef, TimingPolicy};
