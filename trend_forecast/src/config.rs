//! Engine configuration

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when several observations share the exact same timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the value supplied last
    #[default]
    KeepLast,
    /// Keep the value supplied first
    KeepFirst,
    /// Replace the group with the mean of its values
    Average,
}

/// Tunable parameters of [`TrendForecastEngine`](crate::TrendForecastEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Coverage of the prediction interval, strictly between 0 and 1
    pub confidence_level: f64,
    pub duplicate_policy: DuplicatePolicy,
    /// Consider a log-linear fit when every value is positive
    pub allow_log_linear: bool,
    /// Below this many observations a limited-data warning is raised
    pub min_reliable_observations: usize,
    /// Residual coefficient of variation above which a volatility warning is raised
    pub volatility_threshold: f64,
    /// Sample size at which the sample-size factor of the confidence score reaches 0.5
    pub sample_half_saturation: f64,
    /// Fit-quality factor used for a series with no variance
    pub flat_series_fit: f64,
    /// Growth rates below this magnitude are described as stable
    pub stable_growth_threshold: f64,
    /// Growth rates above this magnitude are described as strong
    pub strong_growth_threshold: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.90,
            duplicate_policy: DuplicatePolicy::KeepLast,
            allow_log_linear: true,
            min_reliable_observations: 4,
            volatility_threshold: 0.10,
            sample_half_saturation: 4.0,
            flat_series_fit: 0.5,
            stable_growth_threshold: 0.005,
            strong_growth_threshold: 0.05,
        }
    }
}

impl ForecastConfig {
    /// Load a configuration from JSON; missing keys take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_log_linear(mut self, allow: bool) -> Self {
        self.allow_log_linear = allow;
        self
    }

    pub fn with_volatility_threshold(mut self, threshold: f64) -> Self {
        self.volatility_threshold = threshold;
        self
    }

    /// Check every parameter is in range
    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::InvalidConfig(
                "Confidence level must be between 0 and 1".to_string(),
            ));
        }
        if !(self.volatility_threshold.is_finite() && self.volatility_threshold > 0.0) {
            return Err(ForecastError::InvalidConfig(
                "Volatility threshold must be positive".to_string(),
            ));
        }
        if !(self.sample_half_saturation.is_finite() && self.sample_half_saturation > 0.0) {
            return Err(ForecastError::InvalidConfig(
                "Sample half-saturation must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.flat_series_fit) {
            return Err(ForecastError::InvalidConfig(
                "Flat series fit must be between 0 and 1".to_string(),
            ));
        }
        if !(self.stable_growth_threshold >= 0.0
            && self.strong_growth_threshold > self.stable_growth_threshold)
        {
            return Err(ForecastError::InvalidConfig(format!(
                "Growth thresholds must satisfy 0 <= stable ({}) < strong ({})",
                self.stable_growth_threshold, self.strong_growth_threshold
            )));
        }
        if self.min_reliable_observations < 2 {
            return Err(ForecastError::InvalidConfig(
                "Minimum reliable observations must be at least 2".to_string(),
            ));
        }

        Ok(())
    }
}
