use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// Detected once at startup; the pipeline stays idle with zeroed values.
    #[error("motion sensor unavailable: {0}")]
    SensorUnavailable(String),
    /// A single delivery failed; its payload is discarded and the stream resumes.
    #[error("sensor delivery error: {0}")]
    SensorDelivery(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid state: {0}")]
    State(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing telemetry config")]
    MissingConfig,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
