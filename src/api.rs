//! High-level API for training and cross-validating logistic regression
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rlogreg::api::Experiment;
//! use rlogreg::LabelMap;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = Experiment::new()
//!     .with_folds(10)
//!     .with_learning_rate(0.001)
//!     .with_epochs(1000)
//!     .with_lambda(0.1)
//!     .cross_validate_csv("CKD.csv", &LabelMap::new("Normal", "CKD"))?;
//!
//! println!("Accuracy: {:.4}", report.mean_accuracy);
//! # Ok(())
//! # }
//! ```

use crate::core::{Label, Matrix, Result, TrainingConfig};
use crate::data::{CsvDataset, LabelMap};
use crate::metrics::{accuracy, log_loss, ConfusionMatrix};
use crate::model::LogisticRegression;
use crate::report::CrossValidationReport;
use crate::utils::scaling::fit_transform;
use crate::validation::{CrossValidationResult, KFold};
use log::info;
use std::path::Path;

/// Training and evaluation settings with builder pattern
#[derive(Debug, Clone)]
pub struct Experiment {
    config: TrainingConfig,
    folds: usize,
    seed: Option<u64>,
    scale: bool,
}

impl Default for Experiment {
    fn default() -> Self {
        Self::new()
    }
}

impl Experiment {
    /// Default hyperparameters, 10 folds, unseeded, standardized features
    pub fn new() -> Self {
        Self {
            config: TrainingConfig::default(),
            folds: 10,
            seed: None,
            scale: true,
        }
    }

    pub fn with_config(mut self, config: TrainingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.config.learning_rate = learning_rate;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.config.epochs = epochs;
        self
    }

    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.config.lambda = lambda;
        self
    }

    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Standardize features before training (on by default)
    pub fn with_scaling(mut self, scale: bool) -> Self {
        self.scale = scale;
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    fn kfold(&self) -> KFold {
        let kfold = KFold::new(self.folds);
        match self.seed {
            Some(seed) => kfold.with_seed(seed),
            None => kfold,
        }
    }

    fn prepare(&self, x: &Matrix) -> Result<Matrix> {
        if self.scale {
            let (scaled, _) = fit_transform(x)?;
            Ok(scaled)
        } else {
            Ok(x.clone())
        }
    }

    /// Cross-validate on in-memory data
    pub fn cross_validate(&self, x: &Matrix, y: &[Label]) -> Result<CrossValidationResult> {
        self.config.validate()?;
        let x = self.prepare(x)?;
        let config = self.config;
        self.kfold()
            .evaluate_detailed(|| LogisticRegression::with_config(config), &x, y)
    }

    /// Load a CSV file and cross-validate on it
    pub fn cross_validate_csv<P: AsRef<Path>>(
        &self,
        path: P,
        labels: &LabelMap,
    ) -> Result<CrossValidationReport> {
        let path = path.as_ref();
        let dataset = CsvDataset::from_file(path, labels)?;
        info!(
            "Loaded {} samples with {} features from {:?}",
            dataset.len(),
            dataset.dim(),
            path
        );

        let result = self.cross_validate(dataset.features(), dataset.labels())?;
        Ok(CrossValidationReport::new(
            path.display().to_string(),
            dataset.features().shape(),
            self.folds,
            self.seed,
            self.config,
            &result,
        ))
    }

    /// Fit on all of `x` and score the model on the same data
    pub fn train(&self, x: &Matrix, y: &[Label]) -> Result<TrainingSummary> {
        let x = self.prepare(x)?;
        let mut model = LogisticRegression::with_config(self.config);
        model.fit(&x, y)?;

        let predictions = model.predict(&x)?;
        let probabilities = model.predict_proba(&x)?;

        Ok(TrainingSummary {
            accuracy: accuracy(y, &predictions)?,
            log_loss: log_loss(y, &probabilities)?,
            confusion: ConfusionMatrix::from_predictions(y, &predictions)?,
            model,
        })
    }

    /// Load a CSV file, fit on all of it and score on the same data
    pub fn train_csv<P: AsRef<Path>>(&self, path: P, labels: &LabelMap) -> Result<TrainingSummary> {
        let dataset = CsvDataset::from_file(path, labels)?;
        self.train(dataset.features(), dataset.labels())
    }
}

/// Result of fitting on a full dataset
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub model: LogisticRegression,
    /// Accuracy on the training data
    pub accuracy: f64,
    /// Log loss of the final model on the training data
    pub log_loss: f64,
    pub confusion: ConfusionMatrix,
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;

    fn experiment(config: TrainingConfig, scale: bool) -> Experiment {
        Experiment::new().with_config(config).with_scaling(scale)
    }

    /// Load a CSV file and run k-fold cross-validation on it
    pub fn cross_validate_csv<P: AsRef<Path>>(
        path: P,
        labels: &LabelMap,
        k: usize,
        config: TrainingConfig,
        seed: Option<u64>,
        scale: bool,
    ) -> Result<CrossValidationReport> {
        let exp = experiment(config, scale).with_folds(k);
        let exp = match seed {
            Some(seed) => exp.with_seed(seed),
            None => exp,
        };
        exp.cross_validate_csv(path, labels)
    }

    /// Load a CSV file, fit on all of it and score on the same data
    pub fn train_csv<P: AsRef<Path>>(
        path: P,
        labels: &LabelMap,
        config: TrainingConfig,
        scale: bool,
    ) -> Result<TrainingSummary> {
        experiment(config, scale).train_csv(path, labels)
    }

    /// Mean k-fold accuracy on in-memory data
    pub fn evaluate(
        x: &Matrix,
        y: &[Label],
        k: usize,
        config: TrainingConfig,
    ) -> Result<f64> {
        KFold::new(k).evaluate(|| LogisticRegression::with_config(config), x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn blobs() -> (Matrix, Vec<Label>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..15 {
            let t = i as f64 * 0.1;
            rows.push(vec![10.0 + t, 200.0 - t]);
            labels.push(0);
            rows.push(vec![14.0 + t, 150.0 + t]);
            labels.push(1);
        }
        (Matrix::from_rows(&rows).unwrap(), labels)
    }

    #[test]
    fn test_experiment_builder() {
        let exp = Experiment::new()
            .with_learning_rate(0.05)
            .with_epochs(10)
            .with_lambda(0.2)
            .with_folds(3)
            .with_seed(5)
            .with_scaling(false);

        assert_eq!(exp.config().learning_rate, 0.05);
        assert_eq!(exp.config().epochs, 10);
        assert_eq!(exp.config().lambda, 0.2);
        assert_eq!(exp.kfold().k(), 3);
        assert_eq!(exp.kfold().seed(), Some(5));
    }

    #[test]
    fn test_cross_validate_scaled() {
        let (x, y) = blobs();
        let result = Experiment::new()
            .with_learning_rate(0.1)
            .with_epochs(300)
            .with_folds(5)
            .with_seed(11)
            .cross_validate(&x, &y)
            .unwrap();

        assert_eq!(result.fold_accuracies.len(), 5);
        assert!(result.mean() > 0.9, "got {}", result.mean());
    }

    #[test]
    fn test_cross_validate_rejects_bad_config() {
        let (x, y) = blobs();
        let result = Experiment::new().with_learning_rate(0.0).cross_validate(&x, &y);
        assert!(result.is_err());
    }

    #[test]
    fn test_train_summary() {
        let (x, y) = blobs();
        let summary = Experiment::new()
            .with_learning_rate(0.1)
            .with_epochs(300)
            .train(&x, &y)
            .unwrap();

        assert_eq!(summary.model.loss_history().len(), 300);
        assert!(summary.accuracy > 0.9);
        assert!(summary.log_loss < std::f64::consts::LN_2);
        assert_eq!(summary.confusion.total(), 30);
    }

    fn separable_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "a,b,label").unwrap();
        for i in 0..10 {
            let t = i as f64 * 0.1;
            writeln!(file, "{},{},Normal", -2.0 - t, -1.0).unwrap();
            writeln!(file, "{},{},CKD", 2.0 + t, 1.0).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn fast_config() -> TrainingConfig {
        TrainingConfig {
            learning_rate: 0.1,
            epochs: 200,
            lambda: 0.1,
        }
    }

    #[test]
    fn test_cross_validate_csv() {
        let file = separable_csv();
        let report = Experiment::new()
            .with_config(fast_config())
            .with_folds(4)
            .with_seed(2)
            .cross_validate_csv(file.path(), &LabelMap::default())
            .unwrap();

        assert_eq!(report.n_samples, 20);
        assert_eq!(report.n_features, 2);
        assert_eq!(report.fold_accuracies.len(), 4);
        assert_eq!(report.loss_history.len(), 200);
        assert!(report.mean_accuracy > 0.9);
    }

    #[test]
    fn test_train_csv() {
        let file = separable_csv();
        let summary = Experiment::new()
            .with_config(fast_config())
            .train_csv(file.path(), &LabelMap::default())
            .unwrap();

        assert_eq!(summary.model.weights().unwrap().len(), 2);
        assert_eq!(summary.model.loss_history().len(), 200);
        assert_eq!(summary.confusion.total(), 20);
        assert_eq!(summary.accuracy, 1.0);
    }

    #[test]
    fn test_quick_cross_validate_csv() {
        let file = separable_csv();
        let report = quick::cross_validate_csv(
            file.path(),
            &LabelMap::default(),
            5,
            fast_config(),
            Some(8),
            true,
        )
        .unwrap();

        assert_eq!(report.k, 5);
        assert_eq!(report.seed, Some(8));
        assert_eq!(report.fold_accuracies.len(), 5);
        assert!(report.mean_accuracy > 0.9);

        // Same seed, same folds
        let again = quick::cross_validate_csv(
            file.path(),
            &LabelMap::default(),
            5,
            fast_config(),
            Some(8),
            true,
        )
        .unwrap();
        assert_eq!(report.fold_accuracies, again.fold_accuracies);
    }

    #[test]
    fn test_quick_train_csv() {
        let file = separable_csv();
        let summary =
            quick::train_csv(file.path(), &LabelMap::default(), fast_config(), false).unwrap();

        assert!(summary.accuracy > 0.9);
        assert_eq!(summary.model.config(), &fast_config());

        let err = quick::train_csv(
            file.path(),
            &LabelMap::new("Normal", "Defective"),
            fast_config(),
            true,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_quick_evaluate() {
        let (x, y) = blobs();
        let (scaled, _) = fit_transform(&x).unwrap();
        let acc = quick::evaluate(&scaled, &y, 3, TrainingConfig::default()).unwrap();
        assert!((0.0..=1.0).contains(&acc));
    }
}
