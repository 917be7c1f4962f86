//! Evaluation reports
//!
//! Cross-validation results and loss trajectories are written as JSON or CSV
//! so they can be plotted or compared outside this crate. Trained weights are
//! not part of the report.

use crate::core::{Result, TrainingConfig};
use crate::validation::CrossValidationResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Summary of one cross-validation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossValidationReport {
    /// Dataset identifier, usually the input path
    pub dataset: String,
    pub n_samples: usize,
    pub n_features: usize,
    pub k: usize,
    pub seed: Option<u64>,
    pub config: TrainingConfig,
    pub fold_accuracies: Vec<f64>,
    pub mean_accuracy: f64,
    pub std_accuracy: f64,
    /// Loss per epoch for the last fold trained
    pub loss_history: Vec<f64>,
    /// Library version used to produce the report
    pub library_version: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

impl CrossValidationReport {
    pub fn new(
        dataset: impl Into<String>,
        (n_samples, n_features): (usize, usize),
        k: usize,
        seed: Option<u64>,
        config: TrainingConfig,
        result: &CrossValidationResult,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            n_samples,
            n_features,
            k,
            seed,
            config,
            fold_accuracies: result.fold_accuracies.clone(),
            mean_accuracy: result.mean(),
            std_accuracy: result.std(),
            loss_history: result.last_loss_history.clone(),
            library_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save report to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Load report from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// Print human-readable summary
    pub fn print_summary(&self) {
        println!("=== Cross-Validation Results ===");
        println!("Dataset: {}", self.dataset);
        println!("Samples: {}, features: {}", self.n_samples, self.n_features);
        println!(
            "Parameters: lr={}, epochs={}, lambda={}",
            self.config.learning_rate, self.config.epochs, self.config.lambda
        );
        for (i, acc) in self.fold_accuracies.iter().enumerate() {
            println!("  Fold {:>2}: {:.4}", i + 1, acc);
        }
        println!(
            "{}-fold accuracy: {:.4} (std {:.4})",
            self.k, self.mean_accuracy, self.std_accuracy
        );
    }
}

/// Write a loss trajectory as `epoch,loss` CSV
pub fn write_loss_history<W: Write>(mut writer: W, loss_history: &[f64]) -> Result<()> {
    writeln!(writer, "epoch,loss")?;
    for (epoch, loss) in loss_history.iter().enumerate() {
        writeln!(writer, "{epoch},{loss}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a loss trajectory as `epoch,loss` CSV to `path`
pub fn save_loss_history<P: AsRef<Path>>(path: P, loss_history: &[f64]) -> Result<()> {
    let file = File::create(path)?;
    write_loss_history(BufWriter::new(file), loss_history)
}
