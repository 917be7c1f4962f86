//! K-fold cross-validation
//!
//! Sample indices are shuffled and cut into `k` contiguous folds of
//! near-equal size (the first `n % k` folds get one extra sample). Each fold
//! is held out once while a classifier is trained on the remaining folds;
//! the reported score is the mean held-out accuracy.

use crate::core::{Classifier, Label, LogRegError, Matrix, Result};
use crate::metrics::accuracy;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Per-fold results of a cross-validation run
#[derive(Debug, Clone)]
pub struct CrossValidationResult {
    /// Held-out accuracy for each fold, in fold order
    pub fold_accuracies: Vec<f64>,
    /// Loss trajectory of the model trained on the last fold
    pub last_loss_history: Vec<f64>,
}

impl CrossValidationResult {
    /// Mean accuracy across folds
    pub fn mean(&self) -> f64 {
        if self.fold_accuracies.is_empty() {
            return 0.0;
        }
        self.fold_accuracies.iter().sum::<f64>() / self.fold_accuracies.len() as f64
    }

    /// Population standard deviation of fold accuracies
    pub fn std(&self) -> f64 {
        if self.fold_accuracies.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .fold_accuracies
            .iter()
            .map(|&a| (a - mean).powi(2))
            .sum::<f64>()
            / self.fold_accuracies.len() as f64;
        variance.sqrt()
    }

    /// Lowest fold accuracy, 0.0 when there are no folds
    pub fn min(&self) -> f64 {
        if self.fold_accuracies.is_empty() {
            return 0.0;
        }
        self.fold_accuracies
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// Highest fold accuracy, 0.0 when there are no folds
    pub fn max(&self) -> f64 {
        if self.fold_accuracies.is_empty() {
            return 0.0;
        }
        self.fold_accuracies
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Training and held-out data for one fold
struct FoldData {
    train_x: Matrix,
    train_y: Vec<Label>,
    test_x: Matrix,
    test_y: Vec<Label>,
}

impl FoldData {
    fn new(x: &Matrix, y: &[Label], folds: &[Vec<usize>], held_out: usize) -> Result<Self> {
        let test_idx = &folds[held_out];
        let train_idx: Vec<usize> = folds
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != held_out)
            .flat_map(|(_, fold)| fold.iter().copied())
            .collect();

        Ok(Self {
            train_x: x.select_rows(&train_idx)?,
            train_y: train_idx.iter().map(|&i| y[i]).collect(),
            test_x: x.select_rows(test_idx)?,
            test_y: test_idx.iter().map(|&i| y[i]).collect(),
        })
    }

    fn score<C: Classifier>(&self, model: &mut C) -> Result<f64> {
        model.fit(&self.train_x, &self.train_y)?;
        let predictions = model.predict(&self.test_x)?;
        accuracy(&self.test_y, &predictions)
    }
}

/// K-fold cross-validator
#[derive(Debug, Clone)]
pub struct KFold {
    k: usize,
    seed: Option<u64>,
}

impl Default for KFold {
    fn default() -> Self {
        Self::new(10)
    }
}

impl KFold {
    /// Create a cross-validator with `k` folds, shuffled by the thread-local RNG
    pub fn new(k: usize) -> Self {
        Self { k, seed: None }
    }

    /// Use a seeded generator so splits are reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn check(&self, n_samples: usize) -> Result<()> {
        if self.k < 2 || self.k > n_samples {
            return Err(LogRegError::InvalidConfiguration(format!(
                "k must be in [2, {n_samples}], got: {}",
                self.k
            )));
        }
        Ok(())
    }

    /// Partition the rows of `x` into `k` shuffled folds
    pub fn split(&self, x: &Matrix, y: &[Label]) -> Result<Vec<Vec<usize>>> {
        if y.len() != x.n_rows() {
            return Err(LogRegError::DimensionMismatch {
                expected: x.n_rows(),
                actual: y.len(),
            });
        }
        self.split_indices(x.n_rows())
    }

    /// Partition `0..n_samples` into `k` shuffled folds
    pub fn split_indices(&self, n_samples: usize) -> Result<Vec<Vec<usize>>> {
        match self.seed {
            Some(seed) => self.split_indices_with_rng(n_samples, &mut StdRng::seed_from_u64(seed)),
            None => self.split_indices_with_rng(n_samples, &mut rand::thread_rng()),
        }
    }

    /// Partition `0..n_samples` into `k` folds using the supplied generator
    pub fn split_indices_with_rng<R: Rng + ?Sized>(
        &self,
        n_samples: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec<usize>>> {
        self.check(n_samples)?;

        let mut indices: Vec<usize> = (0..n_samples).collect();
        indices.shuffle(rng);

        let fold_size = n_samples / self.k;
        let remainder = n_samples % self.k;

        let mut folds = Vec::with_capacity(self.k);
        let mut start = 0;
        for i in 0..self.k {
            let len = if i < remainder {
                fold_size + 1
            } else {
                fold_size
            };
            folds.push(indices[start..start + len].to_vec());
            start += len;
        }

        Ok(folds)
    }

    /// Mean held-out accuracy, building a fresh classifier per fold
    pub fn evaluate<C, F>(&self, factory: F, x: &Matrix, y: &[Label]) -> Result<f64>
    where
        C: Classifier,
        F: FnMut() -> C,
    {
        Ok(self.evaluate_detailed(factory, x, y)?.mean())
    }

    /// Per-fold accuracies, building a fresh classifier per fold
    pub fn evaluate_detailed<C, F>(
        &self,
        mut factory: F,
        x: &Matrix,
        y: &[Label],
    ) -> Result<CrossValidationResult>
    where
        C: Classifier,
        F: FnMut() -> C,
    {
        let folds = self.split(x, y)?;
        let mut fold_accuracies = Vec::with_capacity(self.k);
        let mut last_loss_history = Vec::new();

        for i in 0..self.k {
            let fold = FoldData::new(x, y, &folds, i)?;
            let mut model = factory();
            let acc = fold.score(&mut model)?;
            info!(
                "Fold {}/{}: train={}, test={}, accuracy={acc:.4}",
                i + 1,
                self.k,
                fold.train_y.len(),
                fold.test_y.len()
            );
            fold_accuracies.push(acc);

            if i + 1 == self.k {
                last_loss_history = model.loss_history().to_vec();
            }
        }

        let result = CrossValidationResult {
            fold_accuracies,
            last_loss_history,
        };
        info!(
            "{}-fold accuracy: {:.4} (std {:.4})",
            self.k,
            result.mean(),
            result.std()
        );
        Ok(result)
    }

    /// Mean held-out accuracy reusing one classifier for every fold.
    ///
    /// `fit` starts from scratch each fold, so no weights leak between
    /// folds; afterwards `model` holds the state trained on the last fold.
    pub fn evaluate_model<C: Classifier>(
        &self,
        model: &mut C,
        x: &Matrix,
        y: &[Label],
    ) -> Result<f64> {
        let folds = self.split(x, y)?;
        let mut total = 0.0;

        for i in 0..self.k {
            let fold = FoldData::new(x, y, &folds, i)?;
            let acc = fold.score(model)?;
            debug!("Fold {}/{}: accuracy={acc:.4}", i + 1, self.k);
            total += acc;
        }

        Ok(total / self.k as f64)
    }
}
