use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::matrix::DistanceMatrix;

/// Safely convert usize to f64 for mean calculations
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrelationError {
    #[error("Distance matrices are not comparable: {left} vs {right} values")]
    DimensionMismatch { left: usize, right: usize },

    #[error("The {which} distance matrix has zero variance; correlation is undefined")]
    DegenerateInput { which: &'static str },

    #[error("Distance matrices are empty")]
    Empty,
}

/// Correlation between the distance matrices of two protein families
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Pearson correlation coefficient, in [-1, 1]
    pub coefficient: f64,

    /// Number of paired values (matrix size squared)
    pub values: usize,

    /// Matrix size (taxa per family, query included)
    pub size: usize,

    /// Least-squares line of the second family's distances on the first's
    pub slope: f64,
    pub intercept: f64,
}

/// Correlate two distance matrices.
///
/// Both are flattened row-major, diagonal included, and paired by position.
///
/// # Errors
///
/// Returns `CorrelationError::DimensionMismatch` if the matrices differ in
/// size, `CorrelationError::DegenerateInput` if either is constant, or
/// `CorrelationError::Empty` for empty matrices.
pub fn correlate(
    a: &DistanceMatrix,
    b: &DistanceMatrix,
) -> Result<CorrelationResult, CorrelationError> {
    let x = a.flatten();
    let y = b.flatten();

    let coefficient = pearson(x, y)?;
    let (slope, intercept) = linear_fit(x, y);

    debug!(
        "Correlated {} paired distances: r = {coefficient:.6}",
        x.len()
    );

    Ok(CorrelationResult {
        coefficient,
        values: x.len(),
        size: a.size(),
        slope,
        intercept,
    })
}

/// Pearson correlation coefficient between two paired series
///
/// # Errors
///
/// Returns `CorrelationError::DimensionMismatch` for unequal lengths,
/// `CorrelationError::Empty` for empty input, or
/// `CorrelationError::DegenerateInput` if either series has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, CorrelationError> {
    if x.len() != y.len() {
        return Err(CorrelationError::DimensionMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.is_empty() {
        return Err(CorrelationError::Empty);
    }
    if is_constant(x) {
        return Err(CorrelationError::DegenerateInput { which: "first" });
    }
    if is_constant(y) {
        return Err(CorrelationError::DegenerateInput { which: "second" });
    }

    let n = count_to_f64(x.len());
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    let r = cov / denom;
    if !r.is_finite() {
        let which = if var_x > 0.0 { "second" } else { "first" };
        return Err(CorrelationError::DegenerateInput { which });
    }

    Ok(r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

/// Least-squares `(slope, intercept)` of `y` on `x`.
///
/// Callers must have rejected zero-variance `x` already.
fn linear_fit(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = count_to_f64(x.len());
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (sxy, sxx) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxy, sxx), (xi, yi)| {
            let dx = xi - mean_x;
            (sxy + dx * (yi - mean_y), sxx + dx * dx)
        });

    let slope = sxy / sxx;
    (slope, mean_y - slope * mean_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> DistanceMatrix {
        DistanceMatrix::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn example() -> DistanceMatrix {
        matrix(&[&[0.0, 1.0, 2.0], &[1.0, 0.0, 1.0], &[2.0, 1.0, 0.0]])
    }

    #[test]
    fn test_self_correlation_is_one() {
        let m = example();
        let result = correlate(&m, &m).unwrap();
        assert!((result.coefficient - 1.0).abs() < 1e-9);
        assert_eq!(result.values, 9);
        assert_eq!(result.size, 3);
        assert!((result.slope - 1.0).abs() < 1e-9);
        assert!(result.intercept.abs() < 1e-9);
    }

    #[test]
    fn test_negative_correlation() {
        let a = example();
        let b = matrix(&[&[2.0, 1.0, 0.0], &[1.0, 2.0, 1.0], &[0.0, 1.0, 2.0]]);
        let result = correlate(&a, &b).unwrap();
        assert!((result.coefficient + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_scaled_matrix_correlates_perfectly() {
        let a = example();
        let b = matrix(&[&[0.5, 2.5, 4.5], &[2.5, 0.5, 2.5], &[4.5, 2.5, 0.5]]);
        let result = correlate(&a, &b).unwrap();
        assert!((result.coefficient - 1.0).abs() < 1e-9);
        assert!((result.slope - 2.0).abs() < 1e-9);
        assert!((result.intercept - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = example();
        let b = matrix(&[
            &[0.0, 1.0, 2.0, 3.0],
            &[1.0, 0.0, 1.0, 2.0],
            &[2.0, 1.0, 0.0, 1.0],
            &[3.0, 2.0, 1.0, 0.0],
        ]);
        assert_eq!(
            correlate(&a, &b).unwrap_err(),
            CorrelationError::DimensionMismatch { left: 9, right: 16 }
        );
    }

    #[test]
    fn test_constant_matrix_is_degenerate() {
        let zeros = matrix(&[&[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0]]);
        let varying = example();

        assert_eq!(
            correlate(&zeros, &varying).unwrap_err(),
            CorrelationError::DegenerateInput { which: "first" }
        );
        assert_eq!(
            correlate(&varying, &zeros).unwrap_err(),
            CorrelationError::DegenerateInput { which: "second" }
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(pearson(&[], &[]).unwrap_err(), CorrelationError::Empty);
    }

    #[test]
    fn test_pearson_known_value() {
        // r for (1,2,3,4,5) vs (2,4,5,4,5) is 0.7745966692
        let r = pearson(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 5.0, 4.0, 5.0]).unwrap();
        assert!((r - 0.774_596_669_2).abs() < 1e-9);
    }
}
