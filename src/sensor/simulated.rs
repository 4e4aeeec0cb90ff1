//! # Randomized sensor source for demos and tests.
//!
//! [`SimulatedSensor`] fabricates plausible intersection frames: moderate to
//! heavy traffic, a handful of speed samples, a small crowd at the crossing.
//! Frames are produced in wire shape ([`RawReading`]) and pushed through the
//! same validation boundary a hardware adapter would use.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time;

use crate::error::CycleError;
use crate::sensor::reading::{RawReading, SensorReading};
use crate::sensor::source::SensorSource;

/// Sensor source that fabricates random readings.
///
/// Each acquisition sleeps for the configured latency first, mimicking a
/// hardware poll. Latency `Duration::ZERO` skips the sleep entirely.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    latency: Duration,
}

impl SimulatedSensor {
    /// Creates a simulated sensor with the given acquisition latency.
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Fabricates one wire frame.
    ///
    /// Ranges match a busy urban intersection: 50..=300 vehicles per window,
    /// 5..=20 speed samples of 20..=120 km/h, 0..=50 waiting pedestrians.
    fn sample() -> RawReading {
        let mut rng = rand::rng();
        let n = rng.random_range(5..=20);
        let speeds: Vec<i64> = (0..n).map(|_| rng.random_range(20..=120)).collect();
        let light = match rng.random_range(0..3) {
            0 => "RED",
            1 => "YELLOW",
            _ => "GREEN",
        };
        RawReading {
            traffic_volume: Some(rng.random_range(50..=300)),
            vehicle_speeds: Some(speeds),
            pedestrian_count: Some(rng.random_range(0..=50)),
            light_state: Some(light.to_string()),
        }
    }
}

impl Default for SimulatedSensor {
    /// 25 ms latency, roughly a hardware poll over a local link.
    fn default() -> Self {
        Self::new(Duration::from_millis(25))
    }
}

#[async_trait]
impl SensorSource for SimulatedSensor {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn next_reading(&self) -> Result<SensorReading, CycleError> {
        if !self.latency.is_zero() {
            time::sleep(self.latency).await;
        }
        Self::sample().try_into()
    }
}
