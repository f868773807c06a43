//! Observations in, forecasts out

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One historical valuation at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Observation {
    pub date: DateTime<Utc>,
    pub value: f64,
}

impl Observation {
    pub fn new(date: DateTime<Utc>, value: f64) -> Self {
        Self { date, value }
    }
}

/// One predicted future period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: DateTime<Utc>,
    /// Point prediction
    pub value: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl ForecastPoint {
    /// Width of the prediction interval
    pub fn spread(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    /// Whether `actual` falls inside the prediction interval
    pub fn contains(&self, actual: f64) -> bool {
        self.lower_bound <= actual && actual <= self.upper_bound
    }
}

/// Shape of the fitted trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendModel {
    /// Constant absolute change per period
    Linear,
    /// Constant fractional change per period (line fitted to ln(value))
    LogLinear,
}

impl std::fmt::Display for TrendModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendModel::Linear => write!(f, "linear"),
            TrendModel::LogLinear => write!(f, "log-linear"),
        }
    }
}

/// Result of a forecast operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    /// One point per requested period, in date order
    pub predictions: Vec<ForecastPoint>,
    /// Estimated fractional change per period
    pub growth_rate: f64,
    /// Reliability summary in [0, 1]
    pub confidence_score: f64,
    pub insights: Vec<String>,
    pub warnings: Vec<String>,
    /// Which trend shape was selected
    pub model: TrendModel,
    /// Goodness of fit of the selected model on the history (0 for a flat series)
    pub r_squared: f64,
    /// Inferred period length in seconds
    pub period_seconds: f64,
    /// Distinct observations the fit used
    pub observations_used: usize,
}

impl ForecastResult {
    /// Number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.predictions.len()
    }

    /// Point predictions only
    pub fn values(&self) -> Vec<f64> {
        self.predictions.iter().map(|p| p.value).collect()
    }

    /// Serialize to the camelCase JSON the presentation layer reads
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
