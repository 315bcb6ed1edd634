use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MatrixError {
    #[error("Matrix is not square: row {row} has {found} values, expected {expected}")]
    NotSquare {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Matrix has {labels} labels for {size} rows")]
    LabelCount { labels: usize, size: usize },

    #[error("Matrix value at ({row}, {col}) is not finite")]
    NonFinite { row: usize, col: usize },
}

/// Square matrix of pairwise evolutionary distances for one protein family.
///
/// Rows and columns share one ordered axis (selected orthologs plus the query).
/// Values are stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    /// Taxon labels, one per row, when the source provides them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Build a matrix from its rows, validating shape and finiteness
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::NotSquare` if any row length differs from the
    /// number of rows, or `MatrixError::NonFinite` for NaN/infinite values.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);

        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != size {
                return Err(MatrixError::NotSquare {
                    row,
                    found: cells.len(),
                    expected: size,
                });
            }
            for (col, value) in cells.into_iter().enumerate() {
                if !value.is_finite() {
                    return Err(MatrixError::NonFinite { row, col });
                }
                values.push(value);
            }
        }

        Ok(Self {
            labels: Vec::new(),
            size,
            values,
        })
    }

    /// Build a symmetric matrix from a lower triangle (diagonal included).
    ///
    /// Row `i` of `lower` must hold `i + 1` values.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::NotSquare` if a row has the wrong length, or
    /// `MatrixError::NonFinite` for NaN/infinite values.
    pub fn from_lower_triangle(lower: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let size = lower.len();
        let mut rows = vec![vec![0.0; size]; size];

        for (i, cells) in lower.iter().enumerate() {
            if cells.len() != i + 1 {
                return Err(MatrixError::NotSquare {
                    row: i,
                    found: cells.len(),
                    expected: i + 1,
                });
            }
            for (j, &value) in cells.iter().enumerate() {
                rows[i][j] = value;
                rows[j][i] = value;
            }
        }

        Self::new(rows)
    }

    /// Attach taxon labels
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::LabelCount` if the label count differs from the size.
    pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self, MatrixError> {
        if labels.len() != self.size {
            return Err(MatrixError::LabelCount {
                labels: labels.len(),
                size: self.size,
            });
        }
        self.labels = labels;
        Ok(self)
    }

    /// Number of rows (and columns)
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.size && col < self.size {
            Some(self.values[row * self.size + col])
        } else {
            None
        }
    }

    /// All values in row-major order, diagonal included
    #[must_use]
    pub fn flatten(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_row_major() {
        let m = DistanceMatrix::new(vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ])
        .unwrap();

        assert_eq!(m.size(), 3);
        assert_eq!(
            m.flatten(),
            &[0.0, 1.0, 2.0, 1.0, 0.0, 3.0, 2.0, 3.0, 0.0]
        );
        assert_eq!(m.get(1, 2), Some(3.0));
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn test_not_square() {
        let err = DistanceMatrix::new(vec![vec![0.0, 1.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::NotSquare {
                row: 1,
                found: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = DistanceMatrix::new(vec![vec![0.0, f64::NAN], vec![1.0, 0.0]]).unwrap_err();
        assert_eq!(err, MatrixError::NonFinite { row: 0, col: 1 });
    }

    #[test]
    fn test_lower_triangle_is_mirrored() {
        let m = DistanceMatrix::from_lower_triangle(vec![
            vec![0.0],
            vec![0.4, 0.0],
            vec![0.7, 0.2, 0.0],
        ])
        .unwrap();

        assert_eq!(m.get(0, 2), Some(0.7));
        assert_eq!(m.get(2, 0), Some(0.7));
        assert_eq!(m.get(1, 2), Some(0.2));
    }

    #[test]
    fn test_label_count_checked() {
        let m = DistanceMatrix::new(vec![vec![0.0]]).unwrap();
        assert!(m.clone().with_labels(vec!["a".into(), "b".into()]).is_err());
        let labelled = m.with_labels(vec!["a".into()]).unwrap();
        assert_eq!(labelled.labels, vec!["a".to_string()]);
    }
}
