//! # SignalController: lifecycle surface of one traffic signal.
//!
//! The controller owns the pieces a signal needs (policy, source, sinks, bus,
//! shared state) and manages exactly one background [`PhaseCycle`] task:
//!
//! ```text
//! IDLE ──start()──► RUNNING ──stop()──► STOPPING ──(join)──► IDLE
//!   ▲                                                          │
//!   └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - At most **one** phase cycle per controller; `start` on a running
//!   controller is an error, not a second loop
//! - `stop` cancels cooperatively and **joins** the cycle task; when it
//!   returns, no further phase transition can be observed
//! - After stop, the last committed phase stays readable and the controller
//!   can be started again

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::controller::builder::ControllerBuilder;
use crate::controller::config::ControllerConfig;
use crate::controller::cycle::PhaseCycle;
use crate::controller::state::{Phase, SignalState};
use crate::error::ControlError;
use crate::events::{Bus, Event, EventKind};
use crate::policies::PolicyRef;
use crate::sensor::SourceRef;
use crate::telemetry::SinkSet;

/// Handle to a spawned phase cycle.
pub(crate) struct CycleHandle {
    pub(crate) cancel: CancellationToken,
    pub(crate) join: JoinHandle<()>,
}

/// Adaptive controller for a single intersection signal.
///
/// ### Responsibilities
/// - **Lifecycle**: idempotence-checked `start`/`stop` over one cycle task
/// - **Visibility**: lock-free `current_phase`/`is_running`, bus subscription
/// - **Wiring**: hands the cycle its policy, source, sinks and shared state
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use signalvisor::{ControllerConfig, RuleBasedPolicy, SignalController, SimulatedSensor};
///
/// # async fn demo() -> Result<(), signalvisor::ControlError> {
/// let controller = SignalController::builder(ControllerConfig::default())
///     .with_policy(Arc::new(RuleBasedPolicy::default()))
///     .with_source(Arc::new(SimulatedSensor::default()))
///     .build();
///
/// controller.start().await?;
/// // ... signal runs in the background ...
/// controller.stop().await?;
/// # Ok(())
/// # }
/// ```
pub struct SignalController {
    cfg: ControllerConfig,
    policy: PolicyRef,
    source: SourceRef,
    sinks: Arc<SinkSet>,
    bus: Bus,
    state: Arc<SignalState>,
    cycle: Mutex<Option<CycleHandle>>,
}

impl SignalController {
    /// Returns a builder for assembling a controller piece by piece.
    pub fn builder(cfg: ControllerConfig) -> ControllerBuilder {
        ControllerBuilder::new(cfg)
    }

    /// Creates a controller with the given policy and source, no sinks.
    ///
    /// Shorthand for the builder; use the builder when attaching telemetry.
    pub fn new(cfg: ControllerConfig, policy: PolicyRef, source: SourceRef) -> Self {
        ControllerBuilder::new(cfg)
            .with_policy(policy)
            .with_source(source)
            .build()
    }

    pub(crate) fn assemble(
        cfg: ControllerConfig,
        policy: PolicyRef,
        source: SourceRef,
        sinks: Arc<SinkSet>,
        bus: Bus,
    ) -> Self {
        Self {
            cfg,
            policy,
            source,
            sinks,
            bus,
            state: Arc::new(SignalState::new()),
            cycle: Mutex::new(None),
        }
    }

    /// Starts the phase cycle in the background.
    ///
    /// Publishes `ControllerStarted`, then spawns the cycle task. Readings,
    /// decisions and phase changes flow from there; `start` itself returns
    /// immediately.
    ///
    /// # Errors
    /// [`ControlError::AlreadyRunning`] if the cycle task is still running.
    pub async fn start(&self) -> Result<(), ControlError> {
        let mut guard = self.cycle.lock().await;
        if let Some(handle) = guard.as_ref() {
            if !handle.join.is_finished() {
                return Err(ControlError::AlreadyRunning);
            }
            // Stale handle from a cycle that died on its own; replace it.
            guard.take();
        }

        let cancel = CancellationToken::new();
        let task = PhaseCycle {
            cfg: self.cfg.clone(),
            policy: Arc::clone(&self.policy),
            source: Arc::clone(&self.source),
            sinks: Arc::clone(&self.sinks),
            bus: self.bus.clone(),
            state: Arc::clone(&self.state),
        };

        self.state.set_running(true);
        self.bus.publish(Event::new(EventKind::ControllerStarted));
        let join = tokio::spawn(task.run(cancel.clone()));

        *guard = Some(CycleHandle { cancel, join });
        Ok(())
    }

    /// Requests a stop and waits for the cycle task to exit.
    ///
    /// Cancellation is cooperative: the cycle observes it at its next safe
    /// point (loop top, acquisition wait, or mid-hold) and exits. When `stop`
    /// returns, the task is joined and no further phase transition will be
    /// observed. The signal remains in its last committed phase.
    ///
    /// # Errors
    /// [`ControlError::NotRunning`] if no cycle task was started.
    pub async fn stop(&self) -> Result<(), ControlError> {
        let mut guard = self.cycle.lock().await;
        let Some(handle) = guard.take() else {
            return Err(ControlError::NotRunning);
        };

        handle.cancel.cancel();
        if let Err(join_err) = handle.join.await {
            // The cycle task never panics on per-cycle errors; this is a bug
            // guard, not an expected path.
            eprintln!("[signalvisor] phase-cycle task panicked: {join_err:?}");
            self.state.set_running(false);
            self.bus.publish(
                Event::new(EventKind::ControllerStopped).with_reason("cycle_panicked"),
            );
        }
        Ok(())
    }

    /// Returns the currently displayed phase.
    ///
    /// Readable at any time; after a stop it reports the last committed phase.
    pub fn current_phase(&self) -> Phase {
        self.state.phase()
    }

    /// True while the phase cycle is running.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Creates a receiver for controller events.
    ///
    /// Independent per call; only events published after subscribing are seen.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Returns the controller configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::time;

    use crate::error::CycleError;
    use crate::policies::{ModelPolicy, RuleBasedPolicy};
    use crate::sensor::{SensorReading, SourceFn};

    /// Config with millisecond holds so lifecycle tests finish quickly.
    fn fast_cfg() -> ControllerConfig {
        ControllerConfig {
            red_hold: Duration::from_millis(20),
            fallback_green: Duration::from_millis(30),
            source_timeout: Duration::from_millis(500),
            bus_capacity: 256,
        }
    }

    fn steady_source() -> SourceRef {
        SourceFn::arc("steady", || async {
            Ok(SensorReading::new(150, vec![40, 50], 5))
        })
    }

    fn controller(cfg: ControllerConfig, source: SourceRef) -> SignalController {
        SignalController::builder(cfg)
            .with_policy(Arc::new(RuleBasedPolicy::default()))
            .with_source(source)
            .build()
    }

    async fn recv_kind(
        rx: &mut tokio::sync::broadcast::Receiver<Event>,
        kind: EventKind,
    ) -> Event {
        loop {
            let ev = time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("event within deadline")
                .expect("bus open");
            if ev.kind == kind {
                return ev;
            }
        }
    }

    #[tokio::test]
    async fn fresh_controller_is_idle_and_red() {
        let ctl = controller(fast_cfg(), steady_source());
        assert!(!ctl.is_running());
        assert_eq!(ctl.current_phase(), Phase::Red);
    }

    #[tokio::test]
    async fn start_twice_is_rejected() {
        let ctl = controller(fast_cfg(), steady_source());
        ctl.start().await.unwrap();
        let err = ctl.start().await.unwrap_err();
        assert_eq!(err.as_label(), "control_already_running");
        ctl.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_without_start_is_rejected() {
        let ctl = controller(fast_cfg(), steady_source());
        let err = ctl.stop().await.unwrap_err();
        assert_eq!(err.as_label(), "control_not_running");
    }

    #[tokio::test]
    async fn cycle_publishes_decision_and_phase_order() {
        let ctl = controller(fast_cfg(), steady_source());
        let mut rx = ctl.subscribe();
        ctl.start().await.unwrap();

        // 150 vehicles, 5 pedestrians: 30 + 15 = 45s decided hold.
        let decision = recv_kind(&mut rx, EventKind::DecisionMade).await;
        assert_eq!(decision.policy.as_deref(), Some("rule"));
        assert_eq!(decision.hold_ms, Some(45_000));

        let green = recv_kind(&mut rx, EventKind::PhaseChanged).await;
        assert_eq!(green.phase, Some(Phase::Green));
        assert_eq!(green.hold_ms, Some(45_000));
        assert!(green.seq > decision.seq);
        assert!(ctl.is_running());
        assert_eq!(ctl.current_phase(), Phase::Green);

        // The decided hold is 45s; stopping now proves the hold is
        // interruptible rather than waited out.
        let before_stop = std::time::Instant::now();
        ctl.stop().await.unwrap();
        assert!(before_stop.elapsed() < Duration::from_secs(5));
        assert!(!ctl.is_running());
        assert_eq!(ctl.current_phase(), Phase::Green);
    }

    #[tokio::test]
    async fn green_and_red_alternate() {
        // Unavailable model: every cycle falls back to the short hold.
        let ctl = SignalController::builder(ControllerConfig {
            fallback_green: Duration::from_millis(10),
            red_hold: Duration::from_millis(10),
            ..fast_cfg()
        })
        .with_policy(Arc::new(ModelPolicy::unloaded()))
        .with_source(steady_source())
        .build();

        let mut rx = ctl.subscribe();
        ctl.start().await.unwrap();

        let mut phases = Vec::new();
        while phases.len() < 4 {
            let ev = recv_kind(&mut rx, EventKind::PhaseChanged).await;
            phases.push(ev.phase.unwrap());
        }
        ctl.stop().await.unwrap();

        assert_eq!(
            phases,
            vec![Phase::Green, Phase::Red, Phase::Green, Phase::Red]
        );
    }

    #[tokio::test]
    async fn failing_source_applies_fallback_and_loop_survives() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let calls = Arc::new(AtomicU32::new(0));
        let counted = calls.clone();
        // First acquisition fails, later ones succeed.
        let source: SourceRef = SourceFn::arc("flaky", move || {
            let calls = counted.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(CycleError::SourceUnavailable {
                        reason: "link down".into(),
                    })
                } else {
                    Ok(SensorReading::new(100, vec![30], 0))
                }
            }
        });

        let ctl = controller(fast_cfg(), source);
        let mut rx = ctl.subscribe();
        ctl.start().await.unwrap();

        let fallback = recv_kind(&mut rx, EventKind::FallbackApplied).await;
        assert_eq!(fallback.reason.as_deref(), Some("source_unavailable"));
        assert_eq!(fallback.hold_ms, Some(30));

        // The loop survived the failure: a later cycle decides normally.
        let decision = recv_kind(&mut rx, EventKind::DecisionMade).await;
        assert_eq!(decision.hold_ms, Some(40_000));

        ctl.stop().await.unwrap();
    }

    #[tokio::test]
    async fn invalid_frames_are_rejected_then_fall_back() {
        let source: SourceRef = SourceFn::arc("garbage", || async {
            Err(CycleError::InvalidReading {
                reason: "missing traffic_volume".into(),
            })
        });
        let ctl = controller(fast_cfg(), source);
        let mut rx = ctl.subscribe();
        ctl.start().await.unwrap();

        let rejected = recv_kind(&mut rx, EventKind::ReadingRejected).await;
        assert!(rejected.reason.as_deref().unwrap().contains("traffic_volume"));
        let fallback = recv_kind(&mut rx, EventKind::FallbackApplied).await;
        assert_eq!(fallback.reason.as_deref(), Some("invalid_reading"));
        assert_eq!(fallback.cycle, rejected.cycle);

        ctl.stop().await.unwrap();
    }

    #[tokio::test]
    async fn slow_source_times_out_into_fallback() {
        let source: SourceRef = SourceFn::arc("asleep", || async {
            time::sleep(Duration::from_secs(3600)).await;
            Ok(SensorReading::new(1, vec![], 0))
        });
        let ctl = controller(
            ControllerConfig {
                source_timeout: Duration::from_millis(30),
                ..fast_cfg()
            },
            source,
        );
        let mut rx = ctl.subscribe();
        ctl.start().await.unwrap();

        let fallback = recv_kind(&mut rx, EventKind::FallbackApplied).await;
        assert_eq!(fallback.reason.as_deref(), Some("source_unavailable"));

        ctl.stop().await.unwrap();
    }

    #[tokio::test]
    async fn no_transitions_after_stop_returns() {
        let ctl = controller(
            ControllerConfig {
                red_hold: Duration::from_millis(1),
                fallback_green: Duration::from_millis(1),
                ..fast_cfg()
            },
            steady_source(),
        );
        let mut rx = ctl.subscribe();
        ctl.start().await.unwrap();

        // Let a few cycles pass.
        recv_kind(&mut rx, EventKind::PhaseChanged).await;
        ctl.stop().await.unwrap();

        // Drain the backlog: after ControllerStopped, nothing follows.
        let mut saw_stopped = false;
        loop {
            match rx.try_recv() {
                Ok(ev) => {
                    if saw_stopped {
                        panic!("event after ControllerStopped: {:?}", ev.kind);
                    }
                    if ev.kind == EventKind::ControllerStopped {
                        saw_stopped = true;
                    }
                }
                Err(_) => break,
            }
        }
        assert!(saw_stopped);
    }

    #[tokio::test]
    async fn controller_restarts_after_stop() {
        let ctl = controller(fast_cfg(), steady_source());
        let mut rx = ctl.subscribe();

        ctl.start().await.unwrap();
        recv_kind(&mut rx, EventKind::PhaseChanged).await;
        ctl.stop().await.unwrap();
        assert!(!ctl.is_running());

        ctl.start().await.unwrap();
        recv_kind(&mut rx, EventKind::CycleStarted).await;
        assert!(ctl.is_running());
        ctl.stop().await.unwrap();
    }
}
