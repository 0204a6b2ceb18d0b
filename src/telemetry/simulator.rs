use crate::config::SimulationConfig;
use crate::error::EngineError;

use super::random::UnitSource;
use super::reading::{DistanceSample, EngineState, VehicleReading};

const NEAR_DISTANCE_MIN_M: f64 = 5.0;
const NEAR_DISTANCE_SPAN_M: f64 = 7.0;
const CRUISE_DISTANCE_MIN_M: f64 = 10.0;
const CRUISE_DISTANCE_SPAN_M: f64 = 40.0;
const SPEED_MIN_KMH: f64 = 50.0;
const SPEED_SPAN_KMH: f64 = 30.0;
const SIGNAL_STEP_PCT: f64 = 5.0;

/// Rounds to one decimal place, half away from zero.
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Pure step function of the V2V simulation. Owns the engine state and
/// advances it by one tick per [`TelemetrySimulator::step`].
pub struct TelemetrySimulator<S> {
    config: SimulationConfig,
    source: S,
    state: EngineState,
}

impl<S: UnitSource> TelemetrySimulator<S> {
    pub fn new(config: SimulationConfig, source: S) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            state: EngineState::default(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Advances the simulation by one tick. On error the state is left
    /// untouched.
    pub fn step(&mut self) -> Result<&EngineState, EngineError> {
        let tick = self.state.tick_counter + 1;

        let biased = tick % self.config.alert_bias_period == 0
            && self.draw()? < self.config.alert_bias_probability;
        let distance_m = if biased {
            NEAR_DISTANCE_MIN_M + self.draw()? * NEAR_DISTANCE_SPAN_M
        } else {
            CRUISE_DISTANCE_MIN_M + self.draw()? * CRUISE_DISTANCE_SPAN_M
        };
        let speed_kmh = SPEED_MIN_KMH + self.draw()? * SPEED_SPAN_KMH;

        let delta = self.draw()? * 2.0 * SIGNAL_STEP_PCT - SIGNAL_STEP_PCT;
        let signal = (f64::from(self.state.latest.signal_strength_pct) + delta).clamp(0.0, 100.0);

        let reading = VehicleReading {
            speed_kmh: round_tenth(speed_kmh),
            v2v_distance_m: round_tenth(distance_m),
            signal_strength_pct: signal.round() as u8,
        };

        self.state.tick_counter = tick;
        self.state.latest = reading;
        self.state.alert_active = reading.v2v_distance_m < self.config.crash_threshold_m;
        self.state.push_sample(
            DistanceSample {
                tick,
                distance_m: reading.v2v_distance_m,
            },
            self.config.max_history_length,
        );

        Ok(&self.state)
    }

    fn draw(&mut self) -> Result<f64, EngineError> {
        let value = self.source.next_unit();
        if (0.0..1.0).contains(&value) {
            Ok(value)
        } else {
            Err(EngineError::InvalidDraw(value))
        }
    }
}
