//! Error types for the trend_forecast crate

use thiserror::Error;

/// Custom error types for the trend_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Fewer than two distinct observations were supplied
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The requested horizon is not a positive, representable period count
    #[error("Invalid periods: {0}")]
    InvalidPeriods(String),

    /// An observation carries a value the engine cannot use
    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    /// Engine configuration is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error related to loading or validating observation data
    #[error("Data error: {0}")]
    DataError(String),

    /// A date or number could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    MathError(#[from] trend_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON or CSV (de)serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::SerializationError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::SerializationError(err.to_string())
    }
}

impl From<chrono::ParseError> for ForecastError {
    fn from(err: chrono::ParseError) -> Self {
        ForecastError::ParseError(err.to_string())
    }
}
