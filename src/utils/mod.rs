//! Preprocessing and dataset inspection utilities

use crate::core::{Label, Matrix};

/// Feature scaling utilities
pub mod scaling {
    use super::*;
    use crate::core::{LogRegError, Result};

    /// Standard deviations below this are treated as a constant feature
    const MIN_STD: f64 = 1e-12;

    /// Statistics for a single feature
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct FeatureStats {
        pub mean: f64,
        pub std: f64,
    }

    /// Per-feature standardization to zero mean and unit variance
    #[derive(Debug, Clone)]
    pub struct StandardScaler {
        stats: Vec<FeatureStats>,
    }

    impl StandardScaler {
        /// Compute per-column mean and population standard deviation
        pub fn fit(x: &Matrix) -> Self {
            let n = x.n_rows() as f64;
            let stats = (0..x.n_cols())
                .map(|col| {
                    let mean = x.rows().map(|row| row[col]).sum::<f64>() / n;
                    let variance =
                        x.rows().map(|row| (row[col] - mean).powi(2)).sum::<f64>() / n;
                    FeatureStats {
                        mean,
                        std: variance.sqrt(),
                    }
                })
                .collect();
            Self { stats }
        }

        pub fn stats(&self) -> &[FeatureStats] {
            &self.stats
        }

        /// Scale `x` with the fitted statistics
        pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
            if x.n_cols() != self.stats.len() {
                return Err(LogRegError::DimensionMismatch {
                    expected: self.stats.len(),
                    actual: x.n_cols(),
                });
            }

            let mut scaled = x.clone();
            let n_cols = self.stats.len();
            for (i, value) in scaled.data_mut().iter_mut().enumerate() {
                let stats = &self.stats[i % n_cols];
                *value = if stats.std < MIN_STD {
                    0.0
                } else {
                    (*value - stats.mean) / stats.std
                };
            }
            Ok(scaled)
        }
    }

    /// Convenience function: fit and transform in one step
    pub fn fit_transform(x: &Matrix) -> Result<(Matrix, StandardScaler)> {
        let scaler = StandardScaler::fit(x);
        let scaled = scaler.transform(x)?;
        Ok((scaled, scaler))
    }
}

/// Label inspection utilities
pub mod validation {
    use super::*;

    /// Count (positives, negatives)
    pub fn label_balance(labels: &[Label]) -> (usize, usize) {
        let positives = labels.iter().filter(|&&l| l == 1).count();
        (positives, labels.len() - positives)
    }
}
