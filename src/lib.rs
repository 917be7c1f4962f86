//! L2-regularized logistic regression with k-fold cross-validation
//!
//! A binary classifier trained by full-batch gradient descent on dense,
//! pre-cleaned tabular data, and a k-fold harness that estimates its
//! held-out accuracy.

pub mod api;
pub mod core;
pub mod data;
pub mod metrics;
pub mod model;
pub mod report;
pub mod utils;
pub mod validation;

// Re-export main types for convenience
pub use crate::api::{Experiment, TrainingSummary};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{LogRegError, Result};
pub use crate::data::{CsvDataset, LabelMap};
pub use crate::metrics::{accuracy, log_loss, ConfusionMatrix};
pub use crate::model::{sigmoid, LogisticRegression};
pub use crate::report::CrossValidationReport;
pub use crate::utils::scaling::StandardScaler;
pub use crate::validation::{CrossValidationResult, KFold};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
