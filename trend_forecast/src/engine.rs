//! Trend forecasting engine
//!
//! Fits a least-squares trend to a valuation history and projects it forward:
//!
//! 1. Sort observations by date and collapse duplicate timestamps
//! 2. Infer the period length as the median spacing between observations
//! 3. Fit a linear trend, and a log-linear trend when every value is positive,
//!    keeping whichever has the lower residual sum of squares on the original values
//! 4. Project the trend one period at a time with a widening prediction interval
//! 5. Score confidence from fit quality, sample size and horizon
//!
//! The engine holds only its configuration, so one instance can be shared
//! across threads and every call refits from scratch.

use crate::commentary::{self, SeriesProfile};
use crate::config::{DuplicatePolicy, ForecastConfig};
use crate::error::{ForecastError, Result};
use crate::timeline;
use crate::types::{ForecastPoint, ForecastResult, Observation, TrendModel};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, trace};
use trend_math::{fit_line, stats, LeastSquaresFit, MathError, EPSILON};

/// Largest horizon a single call will project
pub const MAX_PERIODS: i64 = 10_000;

/// Regression-based forecaster for valuation histories
#[derive(Debug, Clone, Default)]
pub struct TrendForecastEngine {
    config: ForecastConfig,
}

/// A trend fitted in model space (values or log-values) and scored on the original values
#[derive(Debug, Clone)]
struct TrendFit {
    model: TrendModel,
    line: LeastSquaresFit,
    /// Residual scale in model space
    sigma: f64,
    /// Fitted values on the original scale
    fitted: Vec<f64>,
    /// Residual sum of squares on the original scale, in units of the
    /// largest absolute value
    rss: f64,
}

impl TrendFit {
    fn new(model: TrendModel, x: &[f64], values: &[f64]) -> Result<Self> {
        let y: Vec<f64> = match model {
            TrendModel::Linear => values.to_vec(),
            TrendModel::LogLinear => values.iter().map(|v| v.ln()).collect(),
        };
        let line = fit_line(x, &y)?;

        // A two-point line has no residual degrees of freedom; fall back to
        // the spread of the series itself.
        let sigma = match line.residual_std_error() {
            Some(s) => s,
            None => stats::std_dev(&y)?,
        };

        let fitted: Vec<f64> = x.iter().map(|&xi| to_original(model, line.predict(xi))).collect();
        let scale = stats::magnitude(values);
        let rss = values
            .iter()
            .zip(&fitted)
            .map(|(v, f)| ((v - f) / scale).powi(2))
            .sum();

        Ok(Self {
            model,
            line,
            sigma,
            fitted,
            rss,
        })
    }

    /// Fractional change per period, relative to the mean of the linear fit
    fn growth_rate(&self, baseline: &LeastSquaresFit, values: &[f64]) -> f64 {
        let mean_value = baseline.y_mean();
        match self.model {
            TrendModel::Linear if mean_value.abs() <= EPSILON * stats::magnitude(values) => 0.0,
            TrendModel::Linear => self.line.slope() / mean_value.abs(),
            TrendModel::LogLinear => self.line.slope().exp() - 1.0,
        }
    }

    /// R² on the original scale, `None` for a constant series
    fn r_squared(&self, baseline: &LeastSquaresFit, values: &[f64]) -> Option<f64> {
        match self.model {
            TrendModel::Linear => baseline.r_squared(),
            TrendModel::LogLinear => baseline.r_squared_for(values, &self.fitted),
        }
    }
}

fn to_original(model: TrendModel, y: f64) -> f64 {
    match model {
        TrendModel::Linear => y,
        TrendModel::LogLinear => y.exp(),
    }
}

impl TrendForecastEngine {
    /// Create an engine with a validated configuration
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast `periods` future values from a valuation history.
    ///
    /// Fails with [`ForecastError::InvalidPeriods`] unless `1 <= periods <= MAX_PERIODS`
    /// and with [`ForecastError::InsufficientData`] when fewer than two distinct
    /// timestamps remain after duplicates are collapsed.
    ///
    /// Any finite values can be fitted. A projection whose value or bounds
    /// leave the `f64` range, such as steep compounding over a long horizon,
    /// fails with [`MathError::CalculationError`].
    pub fn generate_forecast(
        &self,
        observations: &[Observation],
        periods: i64,
    ) -> Result<ForecastResult> {
        let horizon = validate_periods(periods)?;
        let series = self.prepare(observations)?;
        let n = series.len();

        let dates: Vec<_> = series.iter().map(|o| o.date).collect();
        let values: Vec<f64> = series.iter().map(|o| o.value).collect();

        let period = timeline::median_spacing(&dates)?;
        let origin = dates[0];
        let x: Vec<f64> = dates
            .iter()
            .map(|&d| timeline::elapsed_periods(origin, d, period))
            .collect();

        let linear = TrendFit::new(TrendModel::Linear, &x, &values)?;
        let baseline = linear.line.clone();
        let fit = self.select_model(linear, &x, &values)?;
        let growth_rate = fit.growth_rate(&baseline, &values);
        let r_squared = fit.r_squared(&baseline, &values);

        let future = timeline::future_dates(dates[n - 1], period, horizon)?;
        let predictions = self.project(&fit, x[n - 1], &future)?;
        let confidence_score = self.confidence_score(r_squared, n, horizon);

        debug!(
            model = %fit.model,
            observations = n,
            periods = horizon,
            growth_rate,
            confidence_score,
            "generated trend forecast"
        );

        let profile = SeriesProfile {
            dates: &dates,
            values: &values,
            x: &x,
            fitted: &fit.fitted,
            model: fit.model,
            growth_rate,
            r_squared,
            horizon,
            projected: predictions.last().map(|p| p.value),
        };

        Ok(ForecastResult {
            predictions,
            growth_rate,
            confidence_score,
            insights: commentary::insights(&profile, &self.config),
            warnings: commentary::warnings(&profile, &self.config),
            model: fit.model,
            r_squared: r_squared.unwrap_or(0.0),
            period_seconds: timeline::duration_seconds(period),
            observations_used: n,
        })
    }

    /// Sort by date and collapse exact-timestamp duplicates
    fn prepare(&self, observations: &[Observation]) -> Result<Vec<Observation>> {
        if let Some(bad) = observations.iter().find(|o| !o.value.is_finite()) {
            return Err(ForecastError::InvalidObservation(format!(
                "Value at {} is not a finite number",
                bad.date
            )));
        }

        let mut sorted = observations.to_vec();
        // stable, so ties keep their insertion order
        sorted.sort_by_key(|o| o.date);

        let mut series: Vec<Observation> = Vec::with_capacity(sorted.len());
        let mut group_len = 0usize;
        for obs in sorted {
            match series.last_mut() {
                Some(last) if last.date == obs.date => {
                    group_len += 1;
                    match self.config.duplicate_policy {
                        DuplicatePolicy::KeepLast => last.value = obs.value,
                        DuplicatePolicy::KeepFirst => {}
                        DuplicatePolicy::Average => {
                            last.value += (obs.value - last.value) / group_len as f64;
                        }
                    }
                }
                _ => {
                    group_len = 1;
                    series.push(obs);
                }
            }
        }

        if series.len() < 2 {
            return Err(ForecastError::InsufficientData(format!(
                "Need at least 2 observations with distinct dates, got {}",
                series.len()
            )));
        }
        if series.len() < observations.len() {
            debug!(
                supplied = observations.len(),
                kept = series.len(),
                policy = ?self.config.duplicate_policy,
                "collapsed duplicate timestamps"
            );
        }

        Ok(series)
    }

    /// Fit the log-linear candidate and keep whichever trend has the lower error
    fn select_model(&self, linear: TrendFit, x: &[f64], values: &[f64]) -> Result<TrendFit> {
        if !self.config.allow_log_linear || values.iter().any(|&v| v <= 0.0) {
            return Ok(linear);
        }

        let log_linear = TrendFit::new(TrendModel::LogLinear, x, values)?;
        debug!(
            linear_rss = linear.rss,
            log_linear_rss = log_linear.rss,
            "compared trend shapes"
        );

        // linear wins ties, including flat series
        if log_linear.rss < linear.rss - 1e-9 * (1.0 + linear.rss) {
            Ok(log_linear)
        } else {
            Ok(linear)
        }
    }

    fn project(
        &self,
        fit: &TrendFit,
        last_x: f64,
        dates: &[chrono::DateTime<chrono::Utc>],
    ) -> Result<Vec<ForecastPoint>> {
        let z = z_score(self.config.confidence_level)?;
        let mut points = Vec::with_capacity(dates.len());

        for (step, &date) in dates.iter().enumerate() {
            let x0 = last_x + (step + 1) as f64;
            let center = fit.line.predict(x0);
            let half_width = z
                * fit.line.prediction_std_error(x0, fit.sigma)
                * (1.0 + step as f64).sqrt();

            let point = ForecastPoint {
                date,
                value: to_original(fit.model, center),
                lower_bound: to_original(fit.model, center - half_width),
                upper_bound: to_original(fit.model, center + half_width),
            };

            if ![point.value, point.lower_bound, point.upper_bound]
                .iter()
                .all(|v| v.is_finite())
            {
                return Err(MathError::CalculationError(format!(
                    "Projection {} periods ahead is not finite",
                    step + 1
                ))
                .into());
            }

            trace!(step = step + 1, value = point.value, half_width, "projected period");
            points.push(point);
        }

        enforce_widening(&mut points);
        Ok(points)
    }

    fn confidence_score(&self, r_squared: Option<f64>, n: usize, horizon: usize) -> f64 {
        let fit_quality = r_squared
            .map(|r| r.clamp(0.0, 1.0))
            .unwrap_or(self.config.flat_series_fit);
        let n = n as f64;
        let sample = n / (n + self.config.sample_half_saturation);
        let horizon_decay = 1.0 / (1.0 + horizon as f64 / n);

        (fit_quality * sample * horizon_decay).clamp(0.0, 1.0)
    }
}

fn validate_periods(periods: i64) -> Result<usize> {
    if periods < 1 {
        return Err(ForecastError::InvalidPeriods(format!(
            "Periods must be at least 1, got {}",
            periods
        )));
    }
    if periods > MAX_PERIODS {
        return Err(ForecastError::InvalidPeriods(format!(
            "Periods must be at most {}, got {}",
            MAX_PERIODS, periods
        )));
    }

    usize::try_from(periods).map_err(|_| {
        ForecastError::InvalidPeriods(format!("Periods out of range: {}", periods))
    })
}

/// Two-sided standard normal critical value for a coverage level
fn z_score(confidence_level: f64) -> Result<f64> {
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| ForecastError::InvalidConfig(e.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + confidence_level / 2.0))
}

/// Pad intervals symmetrically so no period is narrower than the one before.
///
/// Log-linear intervals are asymmetric on the original scale and can narrow
/// on a declining trend.
fn enforce_widening(points: &mut [ForecastPoint]) {
    let mut widest = 0.0_f64;
    for point in points.iter_mut() {
        let spread = point.spread();
        if spread < widest {
            let pad = (widest - spread) / 2.0;
            point.lower_bound -= pad;
            point.upper_bound += pad;
        }
        widest = widest.max(point.spread());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
    }

    fn daily(values: &[f64]) -> Vec<Observation> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Observation::new(start() + Duration::days(i as i64), v))
            .collect()
    }

    #[test]
    fn test_duplicates_keep_last_by_default() {
        let engine = TrendForecastEngine::default();
        let mut obs = daily(&[100.0, 110.0, 120.0]);
        obs.push(Observation::new(start() + Duration::days(1), 111.0));

        let series = engine.prepare(&obs).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[1].value, 111.0);
    }

    #[test]
    fn test_duplicate_policies() {
        let mut obs = daily(&[100.0, 110.0]);
        obs.push(Observation::new(start(), 104.0));
        obs.push(Observation::new(start(), 106.0));

        let first = TrendForecastEngine::new(
            ForecastConfig::default().with_duplicate_policy(DuplicatePolicy::KeepFirst),
        )
        .unwrap();
        assert_eq!(first.prepare(&obs).unwrap()[0].value, 100.0);

        let average = TrendForecastEngine::new(
            ForecastConfig::default().with_duplicate_policy(DuplicatePolicy::Average),
        )
        .unwrap();
        assert_relative_eq!(average.prepare(&obs).unwrap()[0].value, 310.0 / 3.0);
    }

    #[test]
    fn test_duplicates_only_is_insufficient() {
        let engine = TrendForecastEngine::default();
        let obs = vec![
            Observation::new(start(), 1.0),
            Observation::new(start(), 2.0),
        ];
        assert!(matches!(
            engine.prepare(&obs),
            Err(ForecastError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_log_linear_selected_for_compounding_series() {
        let values: Vec<f64> = (0..8).map(|i| 100.0 * 1.1_f64.powi(i)).collect();
        let result = TrendForecastEngine::default()
            .generate_forecast(&daily(&values), 2)
            .unwrap();

        assert_eq!(result.model, TrendModel::LogLinear);
        assert_relative_eq!(result.growth_rate, 0.1, epsilon = 1e-9);
        assert_relative_eq!(
            result.predictions[0].value,
            100.0 * 1.1_f64.powi(8),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_log_linear_disabled() {
        let values: Vec<f64> = (0..8).map(|i| 100.0 * 1.1_f64.powi(i)).collect();
        let engine = TrendForecastEngine::new(ForecastConfig::default().with_log_linear(false)).unwrap();
        let result = engine.generate_forecast(&daily(&values), 2).unwrap();
        assert_eq!(result.model, TrendModel::Linear);
    }

    #[test]
    fn test_z_score_matches_normal_table() {
        assert_relative_eq!(z_score(0.90).unwrap(), 1.6449, epsilon = 1e-3);
        assert_relative_eq!(z_score(0.95).unwrap(), 1.9600, epsilon = 1e-3);
    }

    #[test]
    fn test_enforce_widening_pads_narrow_points() {
        let date = start();
        let mut points = vec![
            ForecastPoint { date, value: 10.0, lower_bound: 8.0, upper_bound: 12.0 },
            ForecastPoint { date, value: 9.0, lower_bound: 8.0, upper_bound: 10.0 },
        ];
        enforce_widening(&mut points);
        assert_relative_eq!(points[1].spread(), 4.0);
        assert!(points[1].contains(9.0));
    }

    #[test]
    fn test_too_many_periods() {
        let result = TrendForecastEngine::default()
            .generate_forecast(&daily(&[1.0, 2.0, 3.0]), MAX_PERIODS + 1);
        assert!(matches!(result, Err(ForecastError::InvalidPeriods(_))));
    }
}
