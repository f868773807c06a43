//! Forecast accuracy metrics and holdout backtesting

use crate::engine::TrendForecastEngine;
use crate::error::{ForecastError, Result};
use crate::types::{ForecastPoint, Observation};
use tracing::debug;

/// Forecast accuracy metrics
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error
    pub mape: f64,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:  {:.4}%", self.mape)?;
        writeln!(f, "  SMAPE: {:.4}%", self.smape)?;
        Ok(())
    }
}

/// Calculate accuracy metrics for a forecast vs actual values
pub fn forecast_accuracy(forecast: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::DataError(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = forecast.len() as f64;

    let errors: Vec<f64> = forecast
        .iter()
        .zip(actual)
        .map(|(&f, &a)| a - f)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    // zero actuals are skipped rather than dividing by zero
    let nonzero = actual.iter().filter(|&&a| a != 0.0).count();
    let mape = if nonzero == 0 {
        0.0
    } else {
        actual
            .iter()
            .zip(&errors)
            .filter(|(&a, _)| a != 0.0)
            .map(|(&a, &e)| (e.abs() / a.abs()) * 100.0)
            .sum::<f64>()
            / nonzero as f64
    };

    let smape = actual
        .iter()
        .zip(forecast)
        .map(|(&a, &f)| {
            let denom = a.abs() + f.abs();
            if denom == 0.0 {
                0.0
            } else {
                200.0 * (a - f).abs() / denom
            }
        })
        .sum::<f64>()
        / n;

    Ok(ForecastAccuracy {
        mae,
        mse,
        rmse,
        mape,
        smape,
    })
}

/// Fraction of actual values that fell inside their prediction interval
pub fn interval_coverage(points: &[ForecastPoint], actual: &[f64]) -> Result<f64> {
    if points.len() != actual.len() || points.is_empty() {
        return Err(ForecastError::DataError(
            "Forecast points and actual values must have the same non-zero length".to_string(),
        ));
    }

    let covered = points
        .iter()
        .zip(actual)
        .filter(|(p, &a)| p.contains(a))
        .count();
    Ok(covered as f64 / points.len() as f64)
}

/// Outcome of scoring a forecast against held-out history
#[derive(Debug, Clone)]
pub struct BacktestReport {
    pub accuracy: ForecastAccuracy,
    /// Fraction of held-out values inside their prediction interval
    pub coverage: f64,
    /// Confidence score the engine reported for the held-out horizon
    pub confidence_score: f64,
}

/// Fit on all but the last `holdout` observations and score the forecast of them.
///
/// The held-out observations are compared by position, so the history should
/// be regularly spaced for the comparison to be meaningful.
pub fn backtest(
    engine: &TrendForecastEngine,
    observations: &[Observation],
    holdout: usize,
) -> Result<BacktestReport> {
    if holdout == 0 {
        return Err(ForecastError::InvalidPeriods(
            "Holdout must contain at least 1 observation".to_string(),
        ));
    }
    if observations.len() < holdout + 2 {
        return Err(ForecastError::InsufficientData(format!(
            "Backtesting {} periods needs at least {} observations, got {}",
            holdout,
            holdout + 2,
            observations.len()
        )));
    }

    let mut sorted = observations.to_vec();
    sorted.sort_by_key(|o| o.date);
    let (train, test) = sorted.split_at(sorted.len() - holdout);

    let periods = i64::try_from(holdout)
        .map_err(|_| ForecastError::InvalidPeriods(format!("Holdout too large: {}", holdout)))?;
    let forecast = engine.generate_forecast(train, periods)?;
    let actual: Vec<f64> = test.iter().map(|o| o.value).collect();

    let accuracy = forecast_accuracy(&forecast.values(), &actual)?;
    let coverage = interval_coverage(&forecast.predictions, &actual)?;
    debug!(holdout, rmse = accuracy.rmse, coverage, "backtest complete");

    Ok(BacktestReport {
        accuracy,
        coverage,
        confidence_score: forecast.confidence_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_forecast_accuracy() {
        let actual = [10.0, 20.0, 30.0, 40.0, 50.0];
        let predicted = [12.0, 18.0, 33.0, 37.0, 52.0];

        let accuracy = forecast_accuracy(&predicted, &actual).unwrap();
        assert_relative_eq!(accuracy.mae, 2.4);
        assert_relative_eq!(accuracy.mse, 6.0);
        assert_relative_eq!(accuracy.rmse, 6.0_f64.sqrt());
        assert!(accuracy.mape > 0.0 && accuracy.mape < 15.0);
        assert!(accuracy.smape > 0.0 && accuracy.smape < 15.0);
    }

    #[test]
    fn test_mismatched_lengths() {
        assert!(forecast_accuracy(&[1.0], &[1.0, 2.0]).is_err());
        assert!(forecast_accuracy(&[], &[]).is_err());
    }

    #[test]
    fn test_display() {
        let accuracy = forecast_accuracy(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
        let text = accuracy.to_string();
        assert!(text.contains("RMSE:  0.0000"));
    }
}
