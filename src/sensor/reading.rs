//! # Sensor readings: raw wire frames and their validated form.
//!
//! Sensor hardware reports loosely-typed frames ([`RawReading`]): every field
//! may be absent, and numeric fields arrive as signed integers. The controller
//! only ever works with [`SensorReading`], the validated form produced at the
//! adapter boundary via `TryFrom<RawReading>`.
//!
//! ## Rules
//! - Validation is **total**: a frame either converts fully or is rejected
//!   with a [`CycleError::InvalidReading`] naming the offending field
//! - The reading timestamp is assigned at validation time, not on the wire
//! - A present but unparseable `light_state` rejects the whole frame
//!
//! ## Example
//! ```rust
//! use signalvisor::{RawReading, SensorReading};
//!
//! let raw = RawReading {
//!     traffic_volume: Some(120),
//!     vehicle_speeds: Some(vec![40, 55, 63]),
//!     pedestrian_count: Some(12),
//!     light_state: Some("RED".to_string()),
//! };
//!
//! let reading = SensorReading::try_from(raw).unwrap();
//! assert_eq!(reading.traffic_volume, 120);
//! assert_eq!(reading.pedestrian_count, 12);
//! ```

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::controller::Phase;
use crate::error::CycleError;

/// Wire-shaped sensor frame, before validation.
///
/// Mirrors what intersection hardware actually emits: all fields optional,
/// counts signed. Convert with `SensorReading::try_from` before use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// Vehicles observed in the last sampling window.
    #[serde(default)]
    pub traffic_volume: Option<i64>,
    /// Recent vehicle speeds, km/h.
    #[serde(default)]
    pub vehicle_speeds: Option<Vec<i64>>,
    /// Pedestrians waiting at the crossing.
    #[serde(default)]
    pub pedestrian_count: Option<i64>,
    /// Observed light state, if the sensor reports it (`"RED"`, `"GREEN"`, `"YELLOW"`).
    #[serde(default, alias = "traffic_light_state")]
    pub light_state: Option<String>,
}

/// Validated intersection snapshot.
///
/// Immutable value object: policies and telemetry read it, nobody mutates it.
/// All counts are non-negative by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// When the frame passed validation.
    pub timestamp: SystemTime,
    /// Vehicles observed in the last sampling window.
    pub traffic_volume: u32,
    /// Recent vehicle speeds, km/h. May be empty.
    pub vehicle_speeds: Vec<u32>,
    /// Pedestrians waiting at the crossing.
    pub pedestrian_count: u32,
    /// Observed light state, if reported.
    pub light_state: Option<Phase>,
}

impl SensorReading {
    /// Creates a reading with the current timestamp and no observed light state.
    pub fn new(traffic_volume: u32, vehicle_speeds: Vec<u32>, pedestrian_count: u32) -> Self {
        Self {
            timestamp: SystemTime::now(),
            traffic_volume,
            vehicle_speeds,
            pedestrian_count,
            light_state: None,
        }
    }

    /// Attaches an observed light state.
    #[inline]
    pub fn with_light_state(mut self, phase: Phase) -> Self {
        self.light_state = Some(phase);
        self
    }
}

fn field_u32(value: Option<i64>, field: &str) -> Result<u32, CycleError> {
    let v = value.ok_or_else(|| CycleError::InvalidReading {
        reason: format!("missing {field}"),
    })?;
    u32::try_from(v).map_err(|_| CycleError::InvalidReading {
        reason: format!("{field} {v} out of range"),
    })
}

impl TryFrom<RawReading> for SensorReading {
    type Error = CycleError;

    fn try_from(raw: RawReading) -> Result<Self, Self::Error> {
        let traffic_volume = field_u32(raw.traffic_volume, "traffic_volume")?;
        let pedestrian_count = field_u32(raw.pedestrian_count, "pedestrian_count")?;

        let speeds = raw.vehicle_speeds.ok_or_else(|| CycleError::InvalidReading {
            reason: "missing vehicle_speeds".to_string(),
        })?;
        let mut vehicle_speeds = Vec::with_capacity(speeds.len());
        for (i, s) in speeds.into_iter().enumerate() {
            let s = u32::try_from(s).map_err(|_| CycleError::InvalidReading {
                reason: format!("vehicle_speeds[{i}] {s} out of range"),
            })?;
            vehicle_speeds.push(s);
        }

        let light_state = match raw.light_state {
            None => None,
            Some(s) => Some(Phase::parse(&s).ok_or_else(|| CycleError::InvalidReading {
                reason: format!("unknown light_state {s:?}"),
            })?),
        };

        Ok(Self {
            timestamp: SystemTime::now(),
            traffic_volume,
            vehicle_speeds,
            pedestrian_count,
            light_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_raw() -> RawReading {
        RawReading {
            traffic_volume: Some(150),
            vehicle_speeds: Some(vec![40, 55, 63]),
            pedestrian_count: Some(8),
            light_state: Some("GREEN".to_string()),
        }
    }

    #[test]
    fn valid_frame_converts() {
        let reading = SensorReading::try_from(valid_raw()).unwrap();
        assert_eq!(reading.traffic_volume, 150);
        assert_eq!(reading.vehicle_speeds, vec![40, 55, 63]);
        assert_eq!(reading.pedestrian_count, 8);
        assert_eq!(reading.light_state, Some(Phase::Green));
    }

    #[test]
    fn light_state_is_optional() {
        let raw = RawReading {
            light_state: None,
            ..valid_raw()
        };
        let reading = SensorReading::try_from(raw).unwrap();
        assert_eq!(reading.light_state, None);
    }

    #[test]
    fn missing_volume_is_rejected() {
        let raw = RawReading {
            traffic_volume: None,
            ..valid_raw()
        };
        let err = SensorReading::try_from(raw).unwrap_err();
        assert!(err.is_rejected_reading());
        assert!(err.as_message().contains("traffic_volume"));
    }

    #[test]
    fn negative_count_is_rejected() {
        let raw = RawReading {
            pedestrian_count: Some(-3),
            ..valid_raw()
        };
        let err = SensorReading::try_from(raw).unwrap_err();
        assert!(err.as_message().contains("pedestrian_count -3"));
    }

    #[test]
    fn negative_speed_is_rejected_with_index() {
        let raw = RawReading {
            vehicle_speeds: Some(vec![40, -5, 63]),
            ..valid_raw()
        };
        let err = SensorReading::try_from(raw).unwrap_err();
        assert!(err.as_message().contains("vehicle_speeds[1]"));
    }

    #[test]
    fn unknown_light_state_is_rejected() {
        let raw = RawReading {
            light_state: Some("PURPLE".to_string()),
            ..valid_raw()
        };
        let err = SensorReading::try_from(raw).unwrap_err();
        assert!(err.as_message().contains("PURPLE"));
    }

    #[test]
    fn empty_speed_list_is_valid() {
        let raw = RawReading {
            vehicle_speeds: Some(vec![]),
            ..valid_raw()
        };
        let reading = SensorReading::try_from(raw).unwrap();
        assert!(reading.vehicle_speeds.is_empty());
    }

    #[test]
    fn deserializes_wire_frame_with_legacy_key() {
        let json = r#"{
            "traffic_volume": 90,
            "vehicle_speeds": [30, 42],
            "pedestrian_count": 4,
            "traffic_light_state": "YELLOW"
        }"#;
        let raw: RawReading = serde_json::from_str(json).unwrap();
        let reading = SensorReading::try_from(raw).unwrap();
        assert_eq!(reading.light_state, Some(Phase::Yellow));
    }

    #[test]
    fn missing_keys_deserialize_as_none() {
        let raw: RawReading = serde_json::from_str("{}").unwrap();
        assert_eq!(raw, RawReading::default());
        assert!(SensorReading::try_from(raw).is_err());
    }
}
