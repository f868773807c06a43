//! Loading observations from CSV and JSON
//!
//! Records must carry exactly a `date` and a `value`. Dates may be RFC 3339
//! timestamps, `YYYY-MM-DD HH:MM:SS` timestamps or plain `YYYY-MM-DD` dates.
//! Timestamps without an offset are read as UTC, and bare dates as midnight UTC.

use crate::error::{ForecastError, Result};
use crate::types::Observation;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A record as it appears in a file, before the date is parsed
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawObservation {
    date: String,
    value: f64,
}

impl RawObservation {
    fn into_observation(self) -> Result<Observation> {
        Ok(Observation::new(parse_date(&self.date)?, self.value))
    }
}

/// Data loader for valuation histories
#[derive(Debug)]
pub struct ObservationLoader;

impl ObservationLoader {
    /// Load observations from a CSV file with a `date,value` header
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Load observations from any CSV source with a `date,value` header
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<Observation>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns: Vec<&str> = headers.iter().collect();
        if columns != ["date", "value"] {
            return Err(ForecastError::DataError(format!(
                "Expected columns [date, value], found {:?}",
                columns
            )));
        }

        csv_reader
            .deserialize::<RawObservation>()
            .map(|row| row?.into_observation())
            .collect()
    }

    /// Load observations from a JSON array of `{"date": ..., "value": ...}` objects
    pub fn from_json_str(json: &str) -> Result<Vec<Observation>> {
        let raw: Vec<RawObservation> = serde_json::from_str(json)?;
        raw.into_iter().map(RawObservation::into_observation).collect()
    }
}

/// Parse an RFC 3339 timestamp, a `YYYY-MM-DD HH:MM:SS` timestamp, or a bare date
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|e| {
        ForecastError::ParseError(format!("Unrecognised date '{}': {}", input, e))
    })?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ForecastError::ParseError(format!("Invalid date '{}'", input)))
}
