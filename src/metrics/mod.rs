//! Classification metrics: accuracy, log loss and confusion matrix

use crate::core::{Label, LogRegError, Result};
use serde::Serialize;

/// Probabilities are clamped into [EPSILON, 1 - EPSILON] before taking logs
pub const EPSILON: f64 = 1e-15;

fn check_lengths(expected: usize, actual: usize) -> Result<()> {
    if expected == 0 {
        return Err(LogRegError::InvalidArgument(
            "metrics require at least one sample".to_string(),
        ));
    }
    if expected != actual {
        return Err(LogRegError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Fraction of positions where `y_true[i] == y_pred[i]`
pub fn accuracy(y_true: &[Label], y_pred: &[Label]) -> Result<f64> {
    check_lengths(y_true.len(), y_pred.len())?;

    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(actual, pred)| actual == pred)
        .count();

    Ok(correct as f64 / y_true.len() as f64)
}

/// Mean binary cross-entropy of `y_true` under predicted probabilities
pub fn log_loss(y_true: &[Label], probabilities: &[f64]) -> Result<f64> {
    check_lengths(y_true.len(), probabilities.len())?;

    let total: f64 = y_true
        .iter()
        .zip(probabilities)
        .map(|(&y, &p)| {
            let p = p.clamp(EPSILON, 1.0 - EPSILON);
            if y == 1 {
                -p.ln()
            } else {
                -(1.0 - p).ln()
            }
        })
        .sum();

    Ok(total / y_true.len() as f64)
}

/// Binary confusion matrix with the positive class = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    /// Tally predictions against ground truth
    pub fn from_predictions(y_true: &[Label], y_pred: &[Label]) -> Result<Self> {
        check_lengths(y_true.len(), y_pred.len())?;

        let mut cm = Self {
            true_positives: 0,
            true_negatives: 0,
            false_positives: 0,
            false_negatives: 0,
        };

        for (&actual, &pred) in y_true.iter().zip(y_pred) {
            match (pred == 1, actual == 1) {
                (true, true) => cm.true_positives += 1,
                (false, false) => cm.true_negatives += 1,
                (true, false) => cm.false_positives += 1,
                (false, true) => cm.false_negatives += 1,
            }
        }

        Ok(cm)
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// (TP + TN) / total
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    /// TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    /// Harmonic mean of precision and recall
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        ratio(
            self.true_negatives,
            self.true_negatives + self.false_positives,
        )
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
