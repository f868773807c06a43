//! # Valuation Trends
//!
//! Workspace facade for valuation trend forecasting.
//!
//! - [`trend_math`]: least-squares fits and descriptive statistics
//! - [`trend_forecast`]: the forecasting engine, its configuration, loaders and accuracy tools
//!
//! ## Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use valuation_trends_workspace::{Observation, TrendForecastEngine};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let history = vec![
//!     Observation::new(start, 100.0),
//!     Observation::new(start + Duration::days(30), 100.0),
//!     Observation::new(start + Duration::days(60), 100.0),
//! ];
//!
//! let forecast = TrendForecastEngine::default().generate_forecast(&history, 2).unwrap();
//! assert_eq!(forecast.predictions.len(), 2);
//! assert!(forecast.growth_rate.abs() < 1e-12);
//! ```

pub use trend_forecast;
pub use trend_math;

pub use trend_forecast::{
    ForecastConfig, ForecastError, ForecastPoint, ForecastResult, Observation,
    TrendForecastEngine, TrendModel,
};
