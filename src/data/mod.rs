//! Data loading
//!
//! Tabular datasets are read from CSV with the class label in the last
//! column and mapped onto binary labels.

pub mod csv;

pub use self::csv::*;
