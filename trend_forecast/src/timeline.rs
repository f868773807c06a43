//! Period inference and future timestamps

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};

/// Median gap between consecutive dates.
///
/// Dates must be sorted and distinct, so the result is always positive.
pub fn median_spacing(dates: &[DateTime<Utc>]) -> Result<Duration> {
    if dates.len() < 2 {
        return Err(ForecastError::InsufficientData(
            "At least 2 dates are needed to infer a period".to_string(),
        ));
    }

    let mut gaps: Vec<Duration> = dates.windows(2).map(|w| w[1] - w[0]).collect();
    if gaps.iter().any(|g| *g <= Duration::zero()) {
        return Err(ForecastError::DataError(
            "Dates must be strictly increasing".to_string(),
        ));
    }
    gaps.sort();

    let mid = gaps.len() / 2;
    let median = if gaps.len() % 2 == 0 {
        (gaps[mid - 1] + gaps[mid]) / 2
    } else {
        gaps[mid]
    };

    Ok(median)
}

/// Length of a duration in seconds
pub fn duration_seconds(duration: Duration) -> f64 {
    match duration.num_nanoseconds() {
        Some(ns) => ns as f64 / 1e9,
        None => duration.num_milliseconds() as f64 / 1e3,
    }
}

/// Time from `origin` to `date`, measured in periods
pub fn elapsed_periods(origin: DateTime<Utc>, date: DateTime<Utc>, period: Duration) -> f64 {
    duration_seconds(date - origin) / duration_seconds(period)
}

/// Create `periods` timestamps, one period apart, starting one period after `last`
pub fn future_dates(
    last: DateTime<Utc>,
    period: Duration,
    periods: usize,
) -> Result<Vec<DateTime<Utc>>> {
    let mut dates = Vec::with_capacity(periods);

    for step in 1..=periods {
        let date = i32::try_from(step)
            .ok()
            .and_then(|k| period.checked_mul(k))
            .and_then(|offset| last.checked_add_signed(offset))
            .ok_or_else(|| {
                ForecastError::InvalidPeriods(format!(
                    "A horizon of {} periods runs past the representable calendar",
                    periods
                ))
            })?;
        dates.push(date);
    }

    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_median_spacing_ignores_one_long_gap() {
        let dates = [day(1), day(2), day(3), day(10), day(11)];
        assert_eq!(median_spacing(&dates).unwrap(), Duration::days(1));
    }

    #[test]
    fn test_median_spacing_even_count() {
        let dates = [day(1), day(2), day(5)];
        assert_eq!(median_spacing(&dates).unwrap(), Duration::hours(48));
    }

    #[test]
    fn test_median_spacing_rejects_unsorted() {
        assert!(median_spacing(&[day(2), day(1)]).is_err());
        assert!(median_spacing(&[day(1)]).is_err());
    }

    #[test]
    fn test_future_dates() {
        let dates = future_dates(day(3), Duration::days(1), 3).unwrap();
        assert_eq!(dates, vec![day(4), day(5), day(6)]);
    }

    #[test]
    fn test_future_dates_overflow() {
        let result = future_dates(day(1), Duration::days(365 * 100_000), 3_000);
        assert!(matches!(result, Err(ForecastError::InvalidPeriods(_))));
    }

    #[test]
    fn test_elapsed_periods() {
        assert_eq!(elapsed_periods(day(1), day(8), Duration::days(7)), 1.0);
        assert_eq!(elapsed_periods(day(1), day(1), Duration::days(7)), 0.0);
    }
}
