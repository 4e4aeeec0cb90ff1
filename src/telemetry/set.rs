//! # SinkSet: non-blocking fan-out over multiple telemetry sinks
//!
//! [`SinkSet`] distributes each [`TelemetryPayload`] to multiple sinks
//! **without awaiting** their processing.
//!
//! ## What it guarantees
//! - `emit(&TelemetryPayload)` returns immediately.
//! - Per-sink FIFO (queue order).
//! - Panics inside sinks are caught and logged (isolation); the worker
//!   keeps serving subsequent payloads.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different sinks.
//! - No retries on per-sink queue overflow (payloads are dropped for that
//!   sink, with a [`SinkOverflow`](crate::EventKind::SinkOverflow) event).
//!
//! ## Diagram
//! ```text
//!    emit(&TelemetryPayload)
//!        │                    (Arc-clone per sink)
//!        ├────────────────► [queue S1] ─► worker S1 ─► send()
//!        ├────────────────► [queue S2] ─► worker S2 ─► send()
//!        └────────────────► [queue SN] ─► worker SN ─► send()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event};
use crate::telemetry::payload::TelemetryPayload;
use crate::telemetry::sink::TelemetrySink;

/// Per-sink channel with metadata
struct SinkChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<TelemetryPayload>>,
}

/// Composite fan-out with per-sink bounded queues and worker tasks.
pub struct SinkSet {
    channels: Vec<SinkChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SinkSet {
    /// Creates a new set and spawns one worker per sink.
    ///
    /// Overflow and panic pathologies are reported on the given [`Bus`] so
    /// observers can tell when telemetry is being lost.
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn TelemetrySink>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(sinks.len());
        let mut workers = Vec::with_capacity(sinks.len());

        for sink in sinks {
            let cap = sink.queue_capacity().max(1);
            let name = sink.name();
            let (tx, mut rx) = mpsc::channel::<Arc<TelemetryPayload>>(cap);
            let s = Arc::clone(&sink);
            let worker_bus = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(payload) = rx.recv().await {
                    let fut = s.send(payload.as_ref());
                    match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        Ok(Ok(())) => {}
                        Ok(Err(err)) => {
                            eprintln!("[signalvisor] sink '{}' failed to send: {err}", s.name());
                        }
                        Err(panic_err) => {
                            eprintln!("[signalvisor] sink '{}' panicked: {panic_err:?}", s.name());
                            worker_bus.publish(Event::sink_panicked(name, format!("{panic_err:?}")));
                        }
                    }
                }
            });

            channels.push(SinkChannel { name, sender: tx });
            workers.push(handle);
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Fan-out one payload to all sinks (non-blocking).
    ///
    /// If a sink's queue is **full** or **closed**, the payload is dropped for
    /// it, a warning is logged and a `SinkOverflow` event is published.
    pub fn emit(&self, payload: &TelemetryPayload) {
        let payload = Arc::new(payload.clone());
        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&payload)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    eprintln!(
                        "[signalvisor] sink '{}' dropped payload: queue full",
                        channel.name
                    );
                    self.bus.publish(Event::sink_overflow(channel.name, "full"));
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    eprintln!(
                        "[signalvisor] sink '{}' dropped payload: worker closed",
                        channel.name
                    );
                    self.bus.publish(Event::sink_overflow(channel.name, "closed"));
                }
            }
        }
    }

    /// Graceful shutdown: close all queues and await worker completion.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no sinks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}
