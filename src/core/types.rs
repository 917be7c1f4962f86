//! Core type definitions for logistic regression

use crate::core::{LogRegError, Result};
use serde::{Deserialize, Serialize};

/// Binary class label (0 or 1)
pub type Label = u8;

/// Check that every label is 0 or 1
pub fn validate_labels(labels: &[Label]) -> Result<()> {
    match labels.iter().find(|&&l| l > 1) {
        Some(&bad) => Err(LogRegError::InvalidLabel(bad)),
        None => Ok(()),
    }
}

/// Dense row-major feature matrix
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from a flat row-major buffer
    pub fn from_vec(n_rows: usize, n_cols: usize, data: Vec<f64>) -> Result<Self> {
        if n_rows == 0 {
            return Err(LogRegError::EmptyDataset);
        }
        if n_cols == 0 {
            return Err(LogRegError::InvalidArgument(
                "Matrix must have at least one feature column".to_string(),
            ));
        }
        if data.len() != n_rows * n_cols {
            return Err(LogRegError::DimensionMismatch {
                expected: n_rows * n_cols,
                actual: data.len(),
            });
        }
        Ok(Self {
            n_rows,
            n_cols,
            data,
        })
    }

    /// Build a matrix from rows, rejecting ragged input
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let first = rows.first().ok_or(LogRegError::EmptyDataset)?;
        let n_cols = first.len();

        let mut data = Vec::with_capacity(rows.len() * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(LogRegError::DimensionMismatch {
                    expected: n_cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Self::from_vec(rows.len(), n_cols, data)
    }

    /// Number of samples
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of features
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Borrow row `i`
    ///
    /// # Panics
    /// Panics if `i >= n_rows()`
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.n_cols;
        &self.data[start..start + self.n_cols]
    }

    /// Iterate over rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.n_cols)
    }

    /// Element at (row, col)
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n_cols + col]
    }

    /// Mutable access to the raw row-major buffer
    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Copy the given rows (in the given order) into a new matrix
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self> {
        let mut data = Vec::with_capacity(indices.len() * self.n_cols);
        for &i in indices {
            if i >= self.n_rows {
                return Err(LogRegError::InvalidArgument(format!(
                    "Row index {i} out of bounds for {} rows",
                    self.n_rows
                )));
            }
            data.extend_from_slice(self.row(i));
        }
        Self::from_vec(indices.len(), self.n_cols, data)
    }

    /// X·w, one score per row
    pub fn dot(&self, weights: &[f64]) -> Result<Vec<f64>> {
        if weights.len() != self.n_cols {
            return Err(LogRegError::DimensionMismatch {
                expected: self.n_cols,
                actual: weights.len(),
            });
        }
        Ok(self
            .rows()
            .map(|row| row.iter().zip(weights).map(|(x, w)| x * w).sum())
            .collect())
    }

    /// Xᵗ·r, one value per column
    pub fn transpose_dot(&self, residuals: &[f64]) -> Result<Vec<f64>> {
        if residuals.len() != self.n_rows {
            return Err(LogRegError::DimensionMismatch {
                expected: self.n_rows,
                actual: residuals.len(),
            });
        }
        let mut out = vec![0.0; self.n_cols];
        for (row, &r) in self.rows().zip(residuals) {
            for (acc, &x) in out.iter_mut().zip(row) {
                *acc += x * r;
            }
        }
        Ok(out)
    }
}

/// Hyperparameters for batch gradient descent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Step size for gradient updates
    pub learning_rate: f64,
    /// Number of full-batch gradient steps
    pub epochs: usize,
    /// L2 penalty strength, applied to weights only
    pub lambda: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            epochs: 1000,
            lambda: 0.1,
        }
    }
}

impl TrainingConfig {
    /// Reject non-finite or out-of-range hyperparameters
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(LogRegError::InvalidConfiguration(format!(
                "learning rate must be positive and finite, got: {}",
                self.learning_rate
            )));
        }
        if !self.lambda.is_finite() || self.lambda < 0.0 {
            return Err(LogRegError::InvalidConfiguration(format!(
                "lambda must be non-negative and finite, got: {}",
                self.lambda
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_from_rows() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.get(2, 0), 5.0);
        assert_eq!(m.rows().count(), 3);
    }

    #[test]
    fn test_matrix_rejects_ragged_rows() {
        let result = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(
            result,
            Err(LogRegError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_matrix_rejects_empty() {
        assert!(matches!(
            Matrix::from_rows(&[]),
            Err(LogRegError::EmptyDataset)
        ));
        assert!(matches!(
            Matrix::from_rows(&[vec![]]),
            Err(LogRegError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_select_rows() {
        let m = Matrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let sub = m.select_rows(&[2, 0]).unwrap();
        assert_eq!(sub.shape(), (2, 1));
        assert_eq!(sub.row(0), &[3.0]);
        assert_eq!(sub.row(1), &[1.0]);

        assert!(m.select_rows(&[3]).is_err());
    }

    #[test]
    fn test_dot_and_transpose_dot() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.dot(&[1.0, 1.0]).unwrap(), vec![3.0, 7.0]);
        // [1 3; 2 4] · [1, -1] = [-2, -2]
        assert_eq!(m.transpose_dot(&[1.0, -1.0]).unwrap(), vec![-2.0, -2.0]);

        assert!(m.dot(&[1.0]).is_err());
        assert!(m.transpose_dot(&[1.0]).is_err());
    }

    #[test]
    fn test_validate_labels() {
        assert!(validate_labels(&[0, 1, 1, 0]).is_ok());
        assert!(matches!(
            validate_labels(&[0, 2]),
            Err(LogRegError::InvalidLabel(2))
        ));
    }

    #[test]
    fn test_training_config_default() {
        let config = TrainingConfig::default();
        assert_eq!(config.learning_rate, 0.001);
        assert_eq!(config.epochs, 1000);
        assert_eq!(config.lambda, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_training_config_validation() {
        let bad_lr = TrainingConfig {
            learning_rate: 0.0,
            ..TrainingConfig::default()
        };
        assert!(matches!(
            bad_lr.validate(),
            Err(LogRegError::InvalidConfiguration(_))
        ));

        let bad_lambda = TrainingConfig {
            lambda: -1.0,
            ..TrainingConfig::default()
        };
        assert!(bad_lambda.validate().is_err());

        let nan_lr = TrainingConfig {
            learning_rate: f64::NAN,
            ..TrainingConfig::default()
        };
        assert!(nan_lr.validate().is_err());
    }
}
