//! Human-readable insights and warnings about a forecast

use crate::config::ForecastConfig;
use crate::types::TrendModel;
use chrono::{DateTime, Utc};
use trend_math::{fit_line, stats, turning_points, TurningKind, EPSILON};

/// What the engine learned about the history, handed over for commentary
#[derive(Debug, Clone)]
pub(crate) struct SeriesProfile<'a> {
    pub dates: &'a [DateTime<Utc>],
    pub values: &'a [f64],
    /// Elapsed time in periods
    pub x: &'a [f64],
    /// Trend evaluated at each observation
    pub fitted: &'a [f64],
    pub model: TrendModel,
    pub growth_rate: f64,
    pub r_squared: Option<f64>,
    pub horizon: usize,
    /// Point prediction for the last forecast period
    pub projected: Option<f64>,
}

impl SeriesProfile<'_> {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn is_flat(&self) -> bool {
        self.r_squared.is_none()
    }

    /// Scale used to express absolute changes as fractions
    fn level(&self) -> f64 {
        let level = stats::mean(self.values).map(f64::abs).unwrap_or(0.0);
        if level <= EPSILON * stats::magnitude(self.values) {
            1.0
        } else {
            level
        }
    }

    /// Mean second difference relative to the level of the series
    fn acceleration(&self) -> Option<f64> {
        let second = stats::second_differences(self.values);
        stats::mean(&second).ok().map(|a| a / self.level())
    }

    /// Residual scatter relative to the level of the series
    fn residual_variation(&self) -> Option<f64> {
        let residuals: Vec<f64> = self
            .values
            .iter()
            .zip(self.fitted)
            .map(|(v, f)| v - f)
            .collect();
        stats::coefficient_of_variation(&residuals, self.values).ok()
    }

    /// Relative slopes of the first and second halves of the history
    fn half_slopes(&self) -> Option<(f64, f64)> {
        if self.len() < 4 {
            return None;
        }
        let mid = self.len() / 2;
        let early = fit_line(&self.x[..mid], &self.values[..mid]).ok()?;
        let late = fit_line(&self.x[mid..], &self.values[mid..]).ok()?;
        Some((early.slope() / self.level(), late.slope() / self.level()))
    }
}

fn percent(fraction: f64) -> f64 {
    fraction * 100.0
}

/// Describe the trend: direction, shape, fit, acceleration and turning points
pub(crate) fn insights(profile: &SeriesProfile<'_>, config: &ForecastConfig) -> Vec<String> {
    let mut insights = Vec::new();
    let growth = profile.growth_rate;

    if growth.abs() < config.stable_growth_threshold {
        insights.push(format!(
            "Values have been essentially stable ({:+.2}% per period)",
            percent(growth)
        ));
    } else {
        let strength = if growth.abs() >= config.strong_growth_threshold {
            "Strong"
        } else {
            "Moderate"
        };
        let (direction, verb) = if growth > 0.0 {
            ("upward", "grow")
        } else {
            ("downward", "decline")
        };
        insights.push(format!(
            "{} {} trend: values {} about {:.1}% per period",
            strength,
            direction,
            verb,
            percent(growth.abs())
        ));
    }

    if !profile.is_flat() {
        match profile.model {
            TrendModel::LogLinear => insights.push(
                "Changes compound: a constant-percentage trend fits the history better than a straight line"
                    .to_string(),
            ),
            TrendModel::Linear => insights.push(
                "Values change by a roughly constant amount each period".to_string(),
            ),
        }
    }

    if let Some(r2) = profile.r_squared {
        if r2 >= 0.5 {
            insights.push(format!(
                "The trend explains {:.0}% of historical variation",
                percent(r2.clamp(0.0, 1.0))
            ));
        } else {
            insights.push(format!(
                "The trend explains only {:.0}% of historical variation; values scatter widely around it",
                percent(r2.clamp(0.0, 1.0))
            ));
        }
    }

    if let Some(acceleration) = profile.acceleration() {
        if acceleration.abs() >= config.stable_growth_threshold {
            let text = match (growth >= 0.0, acceleration > 0.0) {
                (true, true) => "Growth is accelerating",
                (true, false) => "Growth is slowing down",
                (false, true) => "The decline is easing",
                (false, false) => "The decline is steepening",
            };
            insights.push(text.to_string());
        }
    }

    let turns = turning_points(profile.values);
    if let Some(last) = turns.last() {
        let kind = match last.kind {
            TurningKind::Peak => "peak",
            TurningKind::Trough => "trough",
        };
        insights.push(format!(
            "The history changed direction {} time(s); the most recent {} was {:.2} on {}",
            turns.len(),
            kind,
            profile.values[last.index],
            profile.dates[last.index].format("%Y-%m-%d")
        ));
    }

    if let (Some(projected), Some(&last)) = (profile.projected, profile.values.last()) {
        if last.abs() > EPSILON * stats::magnitude(profile.values) {
            insights.push(format!(
                "Projected value after {} period(s) is {:.2} ({:+.1}% from the latest observation)",
                profile.horizon,
                projected,
                percent((projected - last) / last.abs())
            ));
        }
    }

    insights
}

/// Flag conditions that make the forecast less trustworthy
pub(crate) fn warnings(profile: &SeriesProfile<'_>, config: &ForecastConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let n = profile.len();

    if n < config.min_reliable_observations {
        warnings.push(format!(
            "Only {} historical observations are available; at least {} are recommended for a reliable trend",
            n, config.min_reliable_observations
        ));
    }

    if profile.is_flat() {
        warnings.push(
            "Historical values are constant; the forecast carries no trend information".to_string(),
        );
    }

    if let Some(variation) = profile.residual_variation() {
        if variation > config.volatility_threshold {
            warnings.push(format!(
                "High volatility: scatter around the trend is {:.1}% of the average value",
                percent(variation)
            ));
        }
    }

    if profile.horizon > n {
        warnings.push(format!(
            "Forecast horizon of {} periods exceeds the {} observations of history; later values are speculative",
            profile.horizon, n
        ));
    }

    if let Some((early, late)) = profile.half_slopes() {
        let threshold = config.stable_growth_threshold;
        if early.abs() >= threshold && late.abs() >= threshold && early.signum() != late.signum() {
            warnings.push(
                "Trend instability: growth changed direction partway through the history"
                    .to_string(),
            );
        }
    }

    warnings
}
