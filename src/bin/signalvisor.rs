//! Adaptive traffic-signal controller CLI.
//!
//! Runs one simulated intersection under the chosen timing policy until a
//! termination signal arrives (or `--run-for` elapses), then stops cleanly.
//!
//! ```text
//! signalvisor                               # rule-based policy, run until Ctrl-C
//! signalvisor --run-for 120                 # stop after two minutes
//! signalvisor --policy model --artifact demos/predictor.json
//! ```
//!
//! With the default `logging` feature, readings and decisions are printed to
//! stdout; control-plane messages go to stderr.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use signalvisor::shutdown;
use signalvisor::{
    ControllerConfig, ModelPolicy, PolicyRef, PredictorArtifact, RuleBasedPolicy,
    SignalController, SimulatedSensor,
};

#[derive(Parser, Debug)]
#[command(name = "signalvisor", version, about = "Adaptive traffic-signal controller")]
struct Cli {
    /// Timing policy for green holds.
    #[arg(long, value_enum, default_value_t = PolicyKind::Rule)]
    policy: PolicyKind,

    /// Path to a fitted predictor artifact (required with --policy model).
    #[arg(long, value_name = "PATH")]
    artifact: Option<PathBuf>,

    /// Run for this many seconds, then stop. Default: run until a signal.
    #[arg(long, value_name = "SECS")]
    run_for: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyKind {
    /// Fixed formula: base hold + volume term + pedestrian bonus.
    Rule,
    /// Fitted linear predictor loaded from `--artifact`.
    Model,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let policy: PolicyRef = match cli.policy {
        PolicyKind::Rule => Arc::new(RuleBasedPolicy::default()),
        PolicyKind::Model => {
            let path = cli
                .artifact
                .as_deref()
                .context("--artifact <PATH> is required with --policy model")?;
            let artifact = PredictorArtifact::load(path)
                .with_context(|| format!("loading predictor artifact from {}", path.display()))?;
            Arc::new(ModelPolicy::new(Arc::new(artifact)))
        }
    };

    let builder = SignalController::builder(ControllerConfig::default())
        .with_policy(policy)
        .with_source(Arc::new(SimulatedSensor::default()));
    #[cfg(feature = "logging")]
    let builder = builder.with_sink(Arc::new(signalvisor::LogSink));

    let controller = builder.build();
    controller.start().await?;
    eprintln!("[signalvisor] controller started (policy={:?})", cli.policy);

    match cli.run_for {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {
                    eprintln!("[signalvisor] ran for {secs}s, stopping");
                }
                sig = shutdown::wait_for_shutdown_signal() => {
                    eprintln!("[signalvisor] received {}, stopping", sig?);
                }
            }
        }
        None => {
            let sig = shutdown::wait_for_shutdown_signal().await?;
            eprintln!("[signalvisor] received {sig}, stopping");
        }
    }

    controller.stop().await?;
    eprintln!(
        "[signalvisor] stopped; last phase {}",
        controller.current_phase()
    );
    Ok(())
}
