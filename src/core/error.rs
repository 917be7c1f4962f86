//! Error types for logistic regression and cross-validation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogRegError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Model not trained")]
    ModelNotTrained,

    #[error("Invalid label: expected 0 or 1, got {0}")]
    InvalidLabel(u8),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Numeric degenerate: {0}")]
    NumericDegenerate(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LogRegError>;
