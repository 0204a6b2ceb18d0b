use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Latest synthetic telemetry snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleReading {
    pub speed_kmh: f64,
    pub v2v_distance_m: f64,
    pub signal_strength_pct: u8,
}

impl Default for VehicleReading {
    fn default() -> Self {
        Self {
            speed_kmh: 60.0,
            v2v_distance_m: 30.0,
            signal_strength_pct: 85,
        }
    }
}

/// One point of the rolling distance chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceSample {
    pub tick: u64,
    pub distance_m: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub latest: VehicleReading,
    /// Ordered by tick, oldest first.
    pub history: VecDeque<DistanceSample>,
    pub alert_active: bool,
    pub tick_counter: u64,
}

impl EngineState {
    /// Appends a sample and evicts the oldest ones beyond `capacity`.
    pub(crate) fn push_sample(&mut self, sample: DistanceSample, capacity: usize) {
        self.history.push_back(sample);
        while self.history.len() > capacity {
            self.history.pop_front();
        }
    }
}
