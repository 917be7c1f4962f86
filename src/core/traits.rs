//! Core traits for binary classifiers

use crate::core::{Label, Matrix, Result};

/// A binary classifier that can be trained and queried repeatedly.
///
/// Cross-validation drives implementors through one `fit`/`predict`
/// cycle per fold.
pub trait Classifier {
    /// Train on `x` (n x d) and labels `y` (length n, values in {0, 1})
    ///
    /// Any previously learned state is discarded.
    fn fit(&mut self, x: &Matrix, y: &[Label]) -> Result<()>;

    /// Predict a label for every row of `x`
    fn predict(&self, x: &Matrix) -> Result<Vec<Label>>;

    /// Training loss per epoch of the most recent fit, if tracked
    fn loss_history(&self) -> &[f64] {
        &[]
    }
}
