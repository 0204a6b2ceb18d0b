use std::path::Path;

use anyhow::Result;
use config::{Environment, File};
use serde::Deserialize;

use crate::error::EngineError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub simulation: SimulationConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Parameters of the telemetry simulator. Defaults match the dashboard's
/// built-in constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Distance in meters below which the crash alert is raised.
    pub crash_threshold_m: f64,
    /// Number of distance samples kept for the chart.
    pub max_history_length: usize,
    pub tick_interval_ms: u64,
    /// Every n-th tick may draw a near-collision distance.
    pub alert_bias_period: u64,
    pub alert_bias_probability: f64,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            crash_threshold_m: 10.0,
            max_history_length: 30,
            tick_interval_ms: 1000,
            alert_bias_period: 12,
            alert_bias_probability: 0.6,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.crash_threshold_m.is_finite() || self.crash_threshold_m <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "crash_threshold_m must be a positive number, got {}",
                self.crash_threshold_m
            )));
        }
        if self.max_history_length == 0 {
            return Err(EngineError::InvalidConfig(
                "max_history_length must be at least 1".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "tick_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.alert_bias_period == 0 {
            return Err(EngineError::InvalidConfig(
                "alert_bias_period must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.alert_bias_probability) {
            return Err(EngineError::InvalidConfig(format!(
                "alert_bias_probability must be within [0, 1], got {}",
                self.alert_bias_probability
            )));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let env = std::env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        let config_path = format!("config/{}.toml", env);
        let fallback_path = format!("/etc/ronin-v2x/{}.toml", env);

        if Path::new(&config_path).exists() {
            Self::load_from(&config_path)
        } else {
            Self::load_from(&fallback_path)
        }
    }

    /// Loads `path` (optional) with `V2X__SECTION__KEY` environment overrides
    /// on top, then validates the simulation section.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("V2X")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.simulation.validate()?;
        Ok(config)
    }
}
