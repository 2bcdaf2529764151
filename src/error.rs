use std::io;
use thiserror::Error;

/// Custom error type for SysPulse
#[derive(Error, Debug)]
pub enum SysPulseError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(String),

    #[error("GPU not available: {0}")]
    GpuNotAvailable(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    #[error("Network probe failed: {0}")]
    Network(String),

    #[error("Sampling engine error: {0}")]
    Engine(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for SysPulse
pub type Result<T> = std::result::Result<T, SysPulseError>;

impl SysPulseError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SysPulseError::Config(msg.into())
    }

    pub fn sensor_unavailable<S: Into<String>>(msg: S) -> Self {
        SysPulseError::SensorUnavailable(msg.into())
    }

    pub fn gpu_not_available<S: Into<String>>(msg: S) -> Self {
        SysPulseError::GpuNotAvailable(msg.into())
    }

    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        SysPulseError::MetricCollection(msg.into())
    }

    pub fn network<S: Into<String>>(msg: S) -> Self {
        SysPulseError::Network(msg.into())
    }

    pub fn engine<S: Into<String>>(msg: S) -> Self {
        SysPulseError::Engine(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SysPulseError::Other(msg.into())
    }
}
