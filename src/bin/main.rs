//! rlogreg Command Line Interface
//!
//! Cross-validates or trains an L2-regularized logistic regression model on
//! CSV data whose last column holds the class label.

use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::{error, info};
use rlogreg::api::Experiment;
use rlogreg::core::{Result, TrainingConfig};
use rlogreg::report::save_loss_history;
use rlogreg::utils::validation::label_balance;
use rlogreg::{CsvDataset, LabelMap};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "rlogreg")]
#[command(about = "L2-regularized logistic regression with k-fold cross-validation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate accuracy with k-fold cross-validation
    Cv(CvArgs),
    /// Fit on the whole dataset and report training metrics
    Train(TrainArgs),
}

#[derive(Args, Clone)]
struct DataArgs {
    /// CSV data file (last column is the label)
    #[arg(long)]
    data: PathBuf,

    /// Class name mapped to label 0
    #[arg(long, default_value = "Normal")]
    negative_label: String,

    /// Class name mapped to label 1
    #[arg(long, default_value = "CKD")]
    positive_label: String,

    /// Skip feature standardization
    #[arg(long)]
    no_scaling: bool,
}

#[derive(Args, Clone)]
struct HyperArgs {
    /// Gradient descent step size
    #[arg(short, long, default_value = "0.001")]
    learning_rate: f64,

    /// Number of gradient steps
    #[arg(short, long, default_value = "1000")]
    epochs: usize,

    /// L2 regularization strength
    #[arg(long, default_value = "0.1")]
    lambda: f64,
}

impl From<&HyperArgs> for TrainingConfig {
    fn from(args: &HyperArgs) -> Self {
        TrainingConfig {
            learning_rate: args.learning_rate,
            epochs: args.epochs,
            lambda: args.lambda,
        }
    }
}

#[derive(Args)]
struct CvArgs {
    #[command(flatten)]
    input: DataArgs,

    #[command(flatten)]
    hyper: HyperArgs,

    /// Number of folds
    #[arg(short = 'k', long, default_value = "10")]
    folds: usize,

    /// Seed for the fold shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Write the JSON report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the last fold's loss curve (epoch,loss) to this file
    #[arg(long)]
    loss_output: Option<PathBuf>,
}

#[derive(Args)]
struct TrainArgs {
    #[command(flatten)]
    input: DataArgs,

    #[command(flatten)]
    hyper: HyperArgs,

    /// Write the loss curve (epoch,loss) to this file
    #[arg(long)]
    loss_output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Cv(args) => cv_command(args),
        Commands::Train(args) => train_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn experiment(data: &DataArgs, hyper: &HyperArgs) -> Experiment {
    Experiment::new()
        .with_config(hyper.into())
        .with_scaling(!data.no_scaling)
}

fn label_map(data: &DataArgs) -> LabelMap {
    LabelMap::new(data.negative_label.clone(), data.positive_label.clone())
}

fn cv_command(args: CvArgs) -> Result<()> {
    info!("Cross-validating on {:?} with k={}", args.input.data, args.folds);

    let mut exp = experiment(&args.input, &args.hyper).with_folds(args.folds);
    if let Some(seed) = args.seed {
        exp = exp.with_seed(seed);
    }

    let report = exp.cross_validate_csv(&args.input.data, &label_map(&args.input))?;
    report.print_summary();

    if let Some(path) = &args.report {
        report.save_to_file(path)?;
        info!("Report saved to: {path:?}");
    }
    if let Some(path) = &args.loss_output {
        save_loss_history(path, &report.loss_history)?;
        info!("Loss curve saved to: {path:?}");
    }

    Ok(())
}

fn train_command(args: TrainArgs) -> Result<()> {
    info!("Training on {:?}", args.input.data);

    let dataset = CsvDataset::from_file(&args.input.data, &label_map(&args.input))?;
    let (positives, negatives) = label_balance(dataset.labels());
    info!(
        "Loaded {} samples with {} features ({positives} positive, {negatives} negative)",
        dataset.len(),
        dataset.dim()
    );

    let summary =
        experiment(&args.input, &args.hyper).train(dataset.features(), dataset.labels())?;
    let model = &summary.model;
    let cm = &summary.confusion;

    println!("=== Training Results ===");
    println!("Data file: {:?}", args.input.data);
    println!(
        "Parameters: lr={}, epochs={}, lambda={}",
        model.config().learning_rate,
        model.config().epochs,
        model.config().lambda
    );
    println!("Training accuracy: {:.2}%", summary.accuracy * 100.0);
    println!("Training log loss: {:.6}", summary.log_loss);

    println!("\nConfusion Matrix:");
    println!("  True Positives:  {}", cm.true_positives);
    println!("  True Negatives:  {}", cm.true_negatives);
    println!("  False Positives: {}", cm.false_positives);
    println!("  False Negatives: {}", cm.false_negatives);
    println!("  Precision:       {:.4}", cm.precision());
    println!("  Recall:          {:.4}", cm.recall());
    println!("  F1 Score:        {:.4}", cm.f1_score());
    println!("  Specificity:     {:.4}", cm.specificity());

    println!("\nModel:");
    println!("  Bias: {:.6}", model.bias());
    if let Some(weights) = model.weights() {
        let names = dataset.feature_names();
        for (i, w) in weights.iter().enumerate() {
            match names.and_then(|n| n.get(i)) {
                Some(name) => println!("  w[{name}]: {w:.6}"),
                None => println!("  w[{i}]: {w:.6}"),
            }
        }
    }

    if let Some(path) = &args.loss_output {
        save_loss_history(path, model.loss_history())?;
        info!("Loss curve saved to: {path:?}");
    }

    Ok(())
}
