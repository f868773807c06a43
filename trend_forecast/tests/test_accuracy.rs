use approx::assert_relative_eq;
use chrono::{Duration, TimeZone, Utc};
use trend_forecast::accuracy::interval_coverage;
use trend_forecast::{backtest, forecast_accuracy, ForecastError, Observation, TrendForecastEngine};

fn monthly(values: &[f64]) -> Vec<Observation> {
    let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| Observation::new(start + Duration::days(30 * i as i64), v))
        .collect()
}

#[test]
fn test_backtest_on_exact_trend() {
    let values: Vec<f64> = (0..12).map(|i| 1_000.0 + 25.0 * i as f64).collect();
    let report = backtest(&TrendForecastEngine::default(), &monthly(&values), 3).unwrap();

    assert!(report.accuracy.rmse < 1e-6);
    assert!(report.accuracy.mape < 1e-6);
    assert!(report.confidence_score > 0.0);
}

#[test]
fn test_backtest_on_noisy_trend() {
    let values = [
        100.0, 103.5, 104.8, 108.9, 109.7, 113.2, 115.9, 116.4, 120.8, 122.1, 125.3, 126.0,
    ];
    let report = backtest(&TrendForecastEngine::default(), &monthly(&values), 2).unwrap();

    assert!(report.accuracy.mape < 5.0);
    assert!((0.0..=1.0).contains(&report.coverage));
}

#[test]
fn test_backtest_rejects_bad_holdout() {
    let observations = monthly(&[1.0, 2.0, 3.0]);
    let engine = TrendForecastEngine::default();

    assert!(matches!(
        backtest(&engine, &observations, 0),
        Err(ForecastError::InvalidPeriods(_))
    ));
    assert!(matches!(
        backtest(&engine, &observations, 2),
        Err(ForecastError::InsufficientData(_))
    ));
}

#[test]
fn test_interval_coverage() {
    let observations = monthly(&[10.0, 12.1, 13.9, 16.2, 17.8, 20.1]);
    let forecast = TrendForecastEngine::default()
        .generate_forecast(&observations, 2)
        .unwrap();

    let inside: Vec<f64> = forecast.values();
    assert_relative_eq!(interval_coverage(&forecast.predictions, &inside).unwrap(), 1.0);

    let outside: Vec<f64> = forecast.predictions.iter().map(|p| p.upper_bound + 1.0).collect();
    assert_relative_eq!(interval_coverage(&forecast.predictions, &outside).unwrap(), 0.0);

    assert!(interval_coverage(&forecast.predictions, &[1.0]).is_err());
}

#[test]
fn test_forecast_accuracy_skips_zero_actuals_in_mape() {
    let accuracy = forecast_accuracy(&[1.0, 11.0], &[0.0, 10.0]).unwrap();
    assert_relative_eq!(accuracy.mape, 10.0);
    assert_relative_eq!(accuracy.mae, 1.0);
}
