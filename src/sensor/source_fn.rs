//! # Function-backed sensor source (`SourceFn`)
//!
//! [`SourceFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per
//! acquisition. This avoids shared mutable state; if a source needs state
//! across calls, hold an `Arc<...>` explicitly inside the closure.
//!
//! ## Example
//! ```rust
//! use signalvisor::{CycleError, SensorReading, SourceFn, SourceRef};
//!
//! let src: SourceRef = SourceFn::arc("loop-detector", || async {
//!     Ok::<_, CycleError>(SensorReading::new(80, vec![45], 2))
//! });
//!
//! assert_eq!(src.name(), "loop-detector");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CycleError;
use crate::sensor::reading::SensorReading;
use crate::sensor::source::SensorSource;

/// Shared reference to a sensor source.
pub type SourceRef = Arc<dyn SensorSource>;

/// Function-backed source implementation.
///
/// Wraps a closure that *creates* a new future per acquisition.
#[derive(Debug)]
pub struct SourceFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> SourceFn<F> {
    /// Creates a new function-backed source.
    ///
    /// Prefer [`SourceFn::arc`] when you immediately need a [`SourceRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the source and returns it as a shared handle (`Arc<dyn SensorSource>`).
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> SensorSource for SourceFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<SensorReading, CycleError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn next_reading(&self) -> Result<SensorReading, CycleError> {
        (self.f)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closure_runs_per_acquisition() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let calls = Arc::new(AtomicU32::new(0));
        let counted = calls.clone();
        let src: SourceRef = SourceFn::arc("counting", move || {
            let calls = counted.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                Ok(SensorReading::new(n, vec![], 0))
            }
        });

        let first = src.next_reading().await.unwrap();
        let second = src.next_reading().await.unwrap();
        assert_eq!(first.traffic_volume, 0);
        assert_eq!(second.traffic_volume, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_pass_through() {
        let src: SourceRef = SourceFn::arc("down", || async {
            Err(CycleError::SourceUnavailable {
                reason: "link down".into(),
            })
        });
        let err = src.next_reading().await.unwrap_err();
        assert_eq!(err.as_label(), "source_unavailable");
    }
}
