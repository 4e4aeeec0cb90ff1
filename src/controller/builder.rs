use std::sync::Arc;

use crate::controller::config::ControllerConfig;
use crate::controller::core::SignalController;
use crate::events::Bus;
use crate::policies::{PolicyRef, RuleBasedPolicy};
use crate::sensor::{SimulatedSensor, SourceRef};
use crate::telemetry::{SinkSet, TelemetrySink};

/// Builder for constructing a SignalController with optional features.
pub struct ControllerBuilder {
    cfg: ControllerConfig,
    policy: Option<PolicyRef>,
    source: Option<SourceRef>,
    sinks: Vec<Arc<dyn TelemetrySink>>,
}

impl ControllerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: ControllerConfig) -> Self {
        Self {
            cfg,
            policy: None,
            source: None,
            sinks: Vec::new(),
        }
    }

    /// Sets the timing policy. Defaults to [`RuleBasedPolicy::default`].
    pub fn with_policy(mut self, policy: PolicyRef) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Sets the sensor source. Defaults to [`SimulatedSensor::default`].
    pub fn with_source(mut self, source: SourceRef) -> Self {
        self.source = Some(source);
        self
    }

    /// Adds one telemetry sink.
    ///
    /// Sinks receive reading and decision payloads through dedicated
    /// workers with bounded queues.
    pub fn with_sink(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Replaces the whole sink list.
    pub fn with_sinks(mut self, sinks: Vec<Arc<dyn TelemetrySink>>) -> Self {
        self.sinks = sinks;
        self
    }

    /// Builds and returns the controller instance.
    ///
    /// This consumes the builder and initializes all components:
    /// - Event bus for broadcasting
    /// - Sink workers (one per sink, spawned immediately)
    /// - Shared signal state (phase `RED`, not running)
    pub fn build(self) -> SignalController {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let sinks = Arc::new(SinkSet::new(self.sinks, bus.clone()));
        let policy = self
            .policy
            .unwrap_or_else(|| Arc::new(RuleBasedPolicy::default()));
        let source = self
            .source
            .unwrap_or_else(|| Arc::new(SimulatedSensor::default()));

        SignalController::assemble(self.cfg, policy, source, sinks, bus)
    }
}
