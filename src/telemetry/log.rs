//! # Simple logging sink for debugging and demos.
//!
//! [`LogSink`] prints payloads to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [reading] {"timestamp_ms":1756100000000,"traffic_volume":220,"vehicle_speeds":[40,62],"pedestrian_count":14,"light_state":"RED"}
//! [decision] {"cycle":1,"policy":"rule","duration_secs":62.0}
//! ```

use async_trait::async_trait;

use crate::telemetry::payload::TelemetryPayload;
use crate::telemetry::sink::{SinkError, TelemetrySink};

/// Simple stdout logging sink.
///
/// Enabled via the `logging` feature. Prints one line per payload, tagged
/// with the payload kind, for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`TelemetrySink`]
/// for structured logging or real telemetry collection.
pub struct LogSink;

#[async_trait]
impl TelemetrySink for LogSink {
    async fn send(&self, payload: &TelemetryPayload) -> Result<(), SinkError> {
        println!("[{}] {payload}", payload.kind().as_str());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
