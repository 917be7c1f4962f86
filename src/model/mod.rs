//! L2-regularized logistic regression trained by full-batch gradient descent
//!
//! The model learns a weight vector `w` and bias `b` so that
//! `sigmoid(x·w + b)` approximates `P(y = 1 | x)`. Each epoch:
//!
//! 1. scores every sample and records the binary cross-entropy,
//! 2. computes `dw = (Xᵗ(p - y) + λw) / n` and `db = Σ(p - y) / n`,
//! 3. steps `w -= lr·dw`, `b -= lr·db`.
//!
//! The penalty is applied to the weights only, never the bias.

use crate::core::{
    validate_labels, Classifier, Label, LogRegError, Matrix, Result, TrainingConfig,
};
use crate::metrics::log_loss;
use log::debug;

/// Scores are clamped into [-SCORE_LIMIT, SCORE_LIMIT] before exponentiation
pub const SCORE_LIMIT: f64 = 500.0;

/// Decision threshold on the predicted probability (strictly greater -> 1)
pub const DECISION_THRESHOLD: f64 = 0.5;

const LOG_EVERY: usize = 100;

/// Logistic function with overflow-safe clamping of the input
pub fn sigmoid(z: f64) -> f64 {
    let z = z.clamp(-SCORE_LIMIT, SCORE_LIMIT);
    1.0 / (1.0 + (-z).exp())
}

fn probabilities(x: &Matrix, weights: &[f64], bias: f64) -> Result<Vec<f64>> {
    Ok(x.dot(weights)?
        .into_iter()
        .map(|score| sigmoid(score + bias))
        .collect())
}

/// Binary logistic regression classifier
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    config: TrainingConfig,
    weights: Option<Vec<f64>>,
    bias: f64,
    loss_history: Vec<f64>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    /// Create an untrained model with default hyperparameters
    pub fn new() -> Self {
        Self::with_config(TrainingConfig::default())
    }

    /// Create an untrained model with the given hyperparameters
    pub fn with_config(config: TrainingConfig) -> Self {
        Self {
            config,
            weights: None,
            bias: 0.0,
            loss_history: Vec::new(),
        }
    }

    /// Set the gradient step size
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.config.learning_rate = learning_rate;
        self
    }

    /// Set the number of gradient steps
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.config.epochs = epochs;
        self
    }

    /// Set the L2 penalty strength
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.config.lambda = lambda;
        self
    }

    /// Train from scratch on `x` and `y`.
    ///
    /// Weights, bias and the loss history are reset first, so after this
    /// call `loss_history()` holds exactly `epochs` entries for this run.
    pub fn fit(&mut self, x: &Matrix, y: &[Label]) -> Result<()> {
        self.config.validate()?;

        let (n_samples, n_features) = x.shape();
        if y.len() != n_samples {
            return Err(LogRegError::DimensionMismatch {
                expected: n_samples,
                actual: y.len(),
            });
        }
        validate_labels(y)?;

        self.weights = None;
        self.bias = 0.0;
        self.loss_history.clear();
        self.loss_history.reserve(self.config.epochs);

        let TrainingConfig {
            learning_rate,
            epochs,
            lambda,
        } = self.config;
        let targets: Vec<f64> = y.iter().map(|&l| f64::from(l)).collect();
        let inv_n = 1.0 / n_samples as f64;

        debug!(
            "Fitting on {n_samples} samples x {n_features} features: lr={learning_rate}, epochs={epochs}, lambda={lambda}"
        );

        let mut weights = vec![0.0; n_features];
        let mut bias = 0.0;

        for epoch in 0..epochs {
            let predicted = probabilities(x, &weights, bias)?;

            let loss = log_loss(y, &predicted)?;
            if !loss.is_finite() {
                self.loss_history.clear();
                return Err(LogRegError::NumericDegenerate(format!(
                    "log loss is {loss} at epoch {epoch}; check the input for NaN or infinite values"
                )));
            }
            self.loss_history.push(loss);

            let residuals: Vec<f64> = predicted
                .iter()
                .zip(&targets)
                .map(|(p, t)| p - t)
                .collect();

            let grad = x.transpose_dot(&residuals)?;
            let bias_grad = inv_n * residuals.iter().sum::<f64>();

            for (w, g) in weights.iter_mut().zip(grad) {
                let dw = inv_n * (g + lambda * *w);
                *w -= learning_rate * dw;
            }
            bias -= learning_rate * bias_grad;

            if epoch % LOG_EVERY == 0 {
                debug!("epoch {epoch}: log loss {loss:.6}");
            }
        }

        debug!(
            "Training finished: bias={bias:.6}, final loss={:?}",
            self.loss_history.last()
        );

        self.weights = Some(weights);
        self.bias = bias;
        Ok(())
    }

    /// Probability of class 1 for every row of `x`
    pub fn predict_proba(&self, x: &Matrix) -> Result<Vec<f64>> {
        let weights = self.weights.as_ref().ok_or(LogRegError::ModelNotTrained)?;
        probabilities(x, weights, self.bias)
    }

    /// Class label for every row of `x`
    pub fn predict(&self, x: &Matrix) -> Result<Vec<Label>> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| Label::from(p > DECISION_THRESHOLD))
            .collect())
    }

    /// Learned weights, `None` before the first successful fit
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Log loss per epoch of the most recent fit
    pub fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, x: &Matrix, y: &[Label]) -> Result<()> {
        LogisticRegression::fit(self, x, y)
    }

    fn predict(&self, x: &Matrix) -> Result<Vec<Label>> {
        LogisticRegression::predict(self, x)
    }

    fn loss_history(&self) -> &[f64] {
        LogisticRegression::loss_history(self)
    }
}
