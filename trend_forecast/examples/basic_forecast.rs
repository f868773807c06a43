use chrono::{Duration, TimeZone, Utc};
use trend_forecast::{backtest, Observation, TrendForecastEngine};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Trend Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    // Quarterly assessed values for one parcel
    let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
    let values = [
        241_000.0, 244_500.0, 249_800.0, 252_100.0, 258_900.0, 263_400.0, 266_000.0, 272_750.0,
        279_300.0, 283_900.0, 290_100.0, 296_400.0,
    ];
    let history: Vec<Observation> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| Observation::new(start + Duration::days(91 * i as i64), v))
        .collect();

    let engine = TrendForecastEngine::default();
    let forecast = engine.generate_forecast(&history, 4)?;

    println!("Model: {}", forecast.model);
    println!("Growth rate per period: {:.4}", forecast.growth_rate);
    println!("Confidence score: {:.3}\n", forecast.confidence_score);

    println!("Predictions (90% interval):");
    for point in &forecast.predictions {
        println!(
            "  {}: {:.0} ({:.0} .. {:.0})",
            point.date.format("%Y-%m-%d"),
            point.value,
            point.lower_bound,
            point.upper_bound
        );
    }

    println!("\nInsights:");
    for insight in &forecast.insights {
        println!("  - {}", insight);
    }

    if !forecast.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &forecast.warnings {
            println!("  ! {}", warning);
        }
    }

    // Score the engine on the last year of history
    let report = backtest(&engine, &history, 4)?;
    println!("\nBacktest on the last 4 quarters:");
    print!("{}", report.accuracy);
    println!("  Interval coverage: {:.0}%", report.coverage * 100.0);

    Ok(())
}
