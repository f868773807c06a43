//! Ordinary least-squares line fits
//!
//! Fits `y = intercept + slope * x` in closed form and keeps the sums needed
//! for goodness of fit and prediction intervals:
//!
//! - Residual sum of squares (RSS) and total sum of squares (TSS)
//! - Residual standard error `s = sqrt(RSS / (n - 2))`
//! - Prediction standard error `s * sqrt(1 + 1/n + (x0 - x̄)² / Sxx)`
//!
//! The sums of squares are accumulated on `y / max|y|`, so any finite input
//! stays in range and goodness of fit does not depend on the units of `y`.

use crate::stats::magnitude;
use crate::{MathError, Result, EPSILON};

/// A fitted least-squares line and its sufficient statistics
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    slope: f64,
    intercept: f64,
    x_mean: f64,
    y_mean: f64,
    /// Sum of squared deviations of x from its mean
    sxx: f64,
    /// Largest absolute y, the unit of the scaled sums below
    y_scale: f64,
    /// Residual sum of squares in units of `y_scale²`
    scaled_rss: f64,
    /// Total sum of squares of y around its mean in units of `y_scale²`
    scaled_tss: f64,
    /// y has no variance relative to its magnitude
    constant: bool,
    n: usize,
}

/// Fit a least-squares line through the points `(x[i], y[i])`
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LeastSquaresFit> {
    if x.len() != y.len() {
        return Err(MathError::InvalidInput(format!(
            "x has {} values but y has {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(MathError::InsufficientData(
            "Not enough data for a line fit. Need at least 2 points.".to_string(),
        ));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Line fit requires finite values".to_string(),
        ));
    }

    let n = x.len() as f64;
    let y_scale = magnitude(y);
    let scaled: Vec<f64> = y.iter().map(|v| v / y_scale).collect();

    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = scaled.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut sxx = 0.0;
    for (&xi, &yi) in x.iter().zip(&scaled) {
        numerator += (xi - x_mean) * (yi - y_mean);
        sxx += (xi - x_mean) * (xi - x_mean);
    }

    if sxx < EPSILON {
        return Err(MathError::CalculationError(
            "Cannot calculate slope: x values are too similar".to_string(),
        ));
    }

    let slope = numerator / sxx;
    let intercept = y_mean - slope * x_mean;

    let mut scaled_rss = 0.0;
    let mut scaled_tss = 0.0;
    let mut sum_sq = 0.0;
    for (&xi, &yi) in x.iter().zip(&scaled) {
        scaled_rss += (yi - (intercept + slope * xi)).powi(2);
        scaled_tss += (yi - y_mean).powi(2);
        sum_sq += yi * yi;
    }

    Ok(LeastSquaresFit {
        slope: slope * y_scale,
        intercept: intercept * y_scale,
        x_mean,
        y_mean: y_mean * y_scale,
        sxx,
        y_scale,
        scaled_rss,
        scaled_tss,
        constant: scaled_tss <= EPSILON * sum_sq,
        n: x.len(),
    })
}

impl LeastSquaresFit {
    /// Fitted slope (change in y per unit of x)
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Fitted intercept at `x = 0`
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Mean of the y values the line was fitted to
    pub fn y_mean(&self) -> f64 {
        self.y_mean
    }

    /// Number of points in the fit
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always false: a fit needs at least two points
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// True when the y values are identical up to rounding
    pub fn is_constant(&self) -> bool {
        self.constant
    }

    /// Evaluate the line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Residuals `y[i] - predict(x[i])` for the supplied points
    pub fn residuals(&self, x: &[f64], y: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(y)
            .map(|(&xi, &yi)| yi - self.predict(xi))
            .collect()
    }

    /// Coefficient of determination.
    ///
    /// `None` when y has no variance, since the ratio is undefined there.
    pub fn r_squared(&self) -> Option<f64> {
        self.explained(self.scaled_rss)
    }

    /// Coefficient of determination of some other curve through the same data.
    ///
    /// `y` must be the values this line was fitted to and `fitted` the other
    /// curve evaluated at the same points. Used to score a fit made in a
    /// transformed space (such as log-values) on the original scale.
    pub fn r_squared_for(&self, y: &[f64], fitted: &[f64]) -> Option<f64> {
        let scaled_rss = y
            .iter()
            .zip(fitted)
            .map(|(v, f)| ((v - f) / self.y_scale).powi(2))
            .sum();
        self.explained(scaled_rss)
    }

    fn explained(&self, scaled_rss: f64) -> Option<f64> {
        if self.constant {
            return None;
        }
        Some(1.0 - scaled_rss / self.scaled_tss)
    }

    /// Residual standard error, `None` without residual degrees of freedom
    pub fn residual_std_error(&self) -> Option<f64> {
        if self.n <= 2 {
            return None;
        }
        Some(self.y_scale * (self.scaled_rss / (self.n - 2) as f64).sqrt())
    }

    /// Standard error of a new observation predicted at `x0`, given the
    /// residual scale `sigma`.
    pub fn prediction_std_error(&self, x0: f64, sigma: f64) -> f64 {
        let n = self.n as f64;
        sigma * (1.0 + 1.0 / n + (x0 - self.x_mean).powi(2) / self.sxx).sqrt()
    }
}
