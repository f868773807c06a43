//! Descriptive statistics over plain `f64` slices

use crate::{MathError, Result, EPSILON};

/// Arithmetic mean of the values
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of the values (average of the two middle values for even lengths)
pub fn median(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the median of an empty series".to_string(),
        ));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Median requires finite values".to_string(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Largest absolute value, or 1 for an empty or all-zero slice.
///
/// Used as the unit when summing squares so large values stay in range.
pub fn magnitude(values: &[f64]) -> f64 {
    let largest = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if largest > 0.0 {
        largest
    } else {
        1.0
    }
}

/// Sample variance (n - 1 denominator)
pub fn variance(values: &[f64]) -> Result<f64> {
    let (scale, ss) = scaled_deviations(values)?;
    Ok(ss / (values.len() - 1) as f64 * scale * scale)
}

/// Sample standard deviation
pub fn std_dev(values: &[f64]) -> Result<f64> {
    let (scale, ss) = scaled_deviations(values)?;
    Ok(scale * (ss / (values.len() - 1) as f64).sqrt())
}

/// Squared deviations from the mean, summed in units of the largest |value|
/// so very large values do not overflow.
fn scaled_deviations(values: &[f64]) -> Result<(f64, f64)> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData(
            "Variance needs at least 2 values".to_string(),
        ));
    }

    let scale = magnitude(values);
    let scaled: Vec<f64> = values.iter().map(|v| v / scale).collect();
    let m = mean(&scaled)?;
    let ss = scaled.iter().map(|v| (v - m).powi(2)).sum();
    Ok((scale, ss))
}

/// Spread of `values` relative to the magnitude of `reference`.
///
/// Returns the sample standard deviation of `values` divided by the absolute
/// mean of `reference`. The two slices differ when measuring residual scatter
/// against the level of the series it came from.
pub fn coefficient_of_variation(values: &[f64], reference: &[f64]) -> Result<f64> {
    let scale = mean(reference)?.abs();
    if scale <= EPSILON * magnitude(reference) {
        return Err(MathError::CalculationError(
            "Reference series has a mean of zero".to_string(),
        ));
    }

    Ok(std_dev(values)? / scale)
}

/// Second differences: `v[i + 2] - 2 v[i + 1] + v[i]`
pub fn second_differences(values: &[f64]) -> Vec<f64> {
    values
        .windows(3)
        .map(|w| w[2] - 2.0 * w[1] + w[0])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_median() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_relative_eq!(mean(&values).unwrap(), 2.8);
        assert_relative_eq!(median(&values).unwrap(), 3.0);

        let even = [4.0, 1.0, 3.0, 2.0];
        assert_relative_eq!(median(&even).unwrap(), 2.5);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(mean(&[]), Err(MathError::InsufficientData(_))));
        assert!(matches!(median(&[]), Err(MathError::InsufficientData(_))));
        assert!(matches!(variance(&[1.0]), Err(MathError::InsufficientData(_))));
    }

    #[test]
    fn test_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // sum of squared deviations from 5 is 32
        assert_relative_eq!(variance(&values).unwrap(), 32.0 / 7.0, epsilon = 1e-12);
        assert_relative_eq!(std_dev(&values).unwrap(), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_std_dev_of_very_large_values() {
        let values = [1e160, 2e160, 3e160];
        assert_relative_eq!(std_dev(&values).unwrap(), 1e160, max_relative = 1e-12);
    }

    #[test]
    fn test_coefficient_of_variation() {
        let residuals = [1.0, -1.0, 1.0, -1.0];
        let levels = [100.0, 100.0, 100.0, 100.0];
        let cv = coefficient_of_variation(&residuals, &levels).unwrap();
        assert_relative_eq!(cv, (4.0_f64 / 3.0).sqrt() / 100.0, epsilon = 1e-12);

        let zero_levels = [1.0, -1.0];
        assert!(coefficient_of_variation(&residuals, &zero_levels).is_err());
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(magnitude(&[-3.0, 2.0]), 3.0);
        assert_eq!(magnitude(&[0.0, 0.0]), 1.0);
        assert_eq!(magnitude(&[]), 1.0);
    }

    #[test]
    fn test_second_differences() {
        assert_eq!(second_differences(&[1.0, 2.0, 4.0, 8.0]), vec![1.0, 2.0]);
        assert!(second_differences(&[1.0, 2.0]).is_empty());
    }
}
