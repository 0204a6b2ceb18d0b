use thiserror::Error;

/// Errors raised by the telemetry engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("Random source produced {0}, expected a value in [0, 1)")]
    InvalidDraw(f64),
}
