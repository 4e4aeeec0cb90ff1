//! # Telemetry payloads: flat field maps sent to sinks.
//!
//! A [`TelemetryPayload`] is a routing kind plus a flat `field name → value`
//! map, the lingua franca of every [`TelemetrySink`](crate::TelemetrySink).
//! Sinks never see domain types; they see maps they can serialize, tag and
//! forward without knowing what a reading or a decision is.
//!
//! ## Field reference
//! - `reading`: `timestamp_ms`, `traffic_volume`, `vehicle_speeds`,
//!   `pedestrian_count`, `light_state` (only when observed)
//! - `decision`: `cycle`, `policy`, `duration_secs`

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};

use crate::policies::PhaseDecision;
use crate::sensor::SensorReading;

/// Routing classification of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// A validated sensor reading, reported before the decision.
    Reading,
    /// A green-hold decision, reported before the hold begins.
    Decision,
}

impl PayloadKind {
    /// Returns the canonical lowercase name (`"reading"`, `"decision"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Reading => "reading",
            PayloadKind::Decision => "decision",
        }
    }
}

/// One unit of telemetry: a kind and a flat field map.
#[derive(Debug, Clone)]
pub struct TelemetryPayload {
    kind: PayloadKind,
    fields: Map<String, Value>,
}

impl TelemetryPayload {
    /// Builds a `reading` payload from a validated sensor reading.
    pub fn reading(reading: &SensorReading) -> Self {
        let mut fields = Map::new();
        fields.insert("timestamp_ms".into(), unix_millis(reading.timestamp).into());
        fields.insert("traffic_volume".into(), reading.traffic_volume.into());
        fields.insert("vehicle_speeds".into(), reading.vehicle_speeds.clone().into());
        fields.insert("pedestrian_count".into(), reading.pedestrian_count.into());
        if let Some(phase) = reading.light_state {
            fields.insert("light_state".into(), phase.as_str().into());
        }
        Self {
            kind: PayloadKind::Reading,
            fields,
        }
    }

    /// Builds a `decision` payload from a committed green-hold decision.
    pub fn decision(decision: &PhaseDecision, policy: &str, cycle: u64) -> Self {
        let mut fields = Map::new();
        fields.insert("cycle".into(), cycle.into());
        fields.insert("policy".into(), policy.into());
        fields.insert("duration_secs".into(), decision.as_secs_f64().into());
        Self {
            kind: PayloadKind::Decision,
            fields,
        }
    }

    /// Returns the routing kind.
    #[inline]
    pub fn kind(&self) -> PayloadKind {
        self.kind
    }

    /// Returns the flat field map.
    #[inline]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Looks up a single field by name.
    #[inline]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl fmt::Display for TelemetryPayload {
    /// Formats the field map as compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.fields) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("{}"),
        }
    }
}

fn unix_millis(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().min(u128::from(u64::MAX)) as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Phase;

    #[test]
    fn reading_payload_carries_every_field() {
        let reading = SensorReading::new(150, vec![40, 55], 8).with_light_state(Phase::Red);
        let payload = TelemetryPayload::reading(&reading);

        assert_eq!(payload.kind(), PayloadKind::Reading);
        assert_eq!(payload.get("traffic_volume"), Some(&Value::from(150)));
        assert_eq!(payload.get("pedestrian_count"), Some(&Value::from(8)));
        assert_eq!(payload.get("vehicle_speeds"), Some(&Value::from(vec![40, 55])));
        assert_eq!(payload.get("light_state"), Some(&Value::from("RED")));
        assert!(payload.get("timestamp_ms").is_some());
    }

    #[test]
    fn unobserved_light_state_is_omitted() {
        let payload = TelemetryPayload::reading(&SensorReading::new(10, vec![], 0));
        assert_eq!(payload.get("light_state"), None);
    }

    #[test]
    fn decision_payload_names_the_policy() {
        let decision = PhaseDecision::from_secs(52.0).unwrap();
        let payload = TelemetryPayload::decision(&decision, "model", 3);

        assert_eq!(payload.kind(), PayloadKind::Decision);
        assert_eq!(payload.get("policy"), Some(&Value::from("model")));
        assert_eq!(payload.get("cycle"), Some(&Value::from(3)));
        assert_eq!(payload.get("duration_secs"), Some(&Value::from(52.0)));
    }

    #[test]
    fn display_is_compact_json() {
        let decision = PhaseDecision::from_secs(45.0).unwrap();
        let payload = TelemetryPayload::decision(&decision, "rule", 1);
        let rendered = payload.to_string();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["policy"], "rule");
        assert_eq!(parsed["duration_secs"], 45.0);
    }
}
