//! # Trend Math
//!
//! Numeric building blocks for trend forecasting.
//! This crate provides descriptive statistics, ordinary least-squares line
//! fits with prediction standard errors, and helpers that describe the shape
//! of a series (second differences, turning points).

use thiserror::Error;

pub mod regression;
pub mod shape;
pub mod stats;

pub use regression::{fit_line, LeastSquaresFit};
pub use shape::{turning_points, TurningKind, TurningPoint};

/// Errors that can occur in trend calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for trend math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Tolerance below which a quantity is treated as zero, relative to the
/// magnitude of the data it came from.
pub const EPSILON: f64 = 1e-12;
