use std::io;
use trend_forecast::ForecastError;
use trend_math::MathError;

#[test]
fn test_error_conversion() {
    // Test IO error conversion
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    // Test math error conversion
    let math_error = MathError::InsufficientData("need 2 points".to_string());
    let forecast_error = ForecastError::from(math_error);
    assert!(matches!(forecast_error, ForecastError::MathError(_)));

    // Test JSON error conversion
    let json_error = serde_json::from_str::<Vec<f64>>("[1.0,").unwrap_err();
    let forecast_error = ForecastError::from(json_error);
    assert!(matches!(forecast_error, ForecastError::SerializationError(_)));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidPeriods("Periods must be at least 1, got 0".to_string());
    let error_string = format!("{}", error);
    assert!(error_string.starts_with("Invalid periods"));
    assert!(error_string.contains("got 0"));

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}

#[test]
fn test_error_messages() {
    let data_error = ForecastError::InsufficientData("Need at least 2 observations".to_string());

    if let ForecastError::InsufficientData(msg) = data_error {
        assert_eq!(msg, "Need at least 2 observations");
    } else {
        panic!("Wrong error variant");
    }
}
