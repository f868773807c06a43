//! # Trend Forecast
//!
//! Regression-based forecasting for valuation histories.
//!
//! ## Features
//!
//! - Linear or log-linear least-squares trend, chosen by fit error
//! - Prediction intervals that widen with the forecast horizon
//! - A confidence score combining fit quality, sample size and horizon
//! - Descriptive insights and risk warnings
//! - Accuracy metrics and holdout backtesting
//! - CSV and JSON loading of `date,value` histories
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use trend_forecast::{Observation, TrendForecastEngine};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let history: Vec<Observation> = [100.0, 110.0, 120.0, 130.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &v)| Observation::new(start + Duration::days(i as i64), v))
//!     .collect();
//!
//! let engine = TrendForecastEngine::default();
//! let forecast = engine.generate_forecast(&history, 1)?;
//!
//! assert!((forecast.predictions[0].value - 140.0).abs() < 1e-6);
//! assert!(forecast.growth_rate > 0.0);
//! # Ok::<(), trend_forecast::ForecastError>(())
//! ```

pub mod accuracy;
mod commentary;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod timeline;
pub mod types;

// Re-export commonly used types
pub use crate::accuracy::{backtest, forecast_accuracy, BacktestReport, ForecastAccuracy};
pub use crate::config::{DuplicatePolicy, ForecastConfig};
pub use crate::data::ObservationLoader;
pub use crate::engine::TrendForecastEngine;
pub use crate::error::{ForecastError, Result};
pub use crate::types::{ForecastPoint, ForecastResult, Observation, TrendModel};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
