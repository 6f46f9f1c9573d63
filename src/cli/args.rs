//! Command line argument parsing for the Aegis CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Aegis - harassment-comment classification pipeline
#[derive(Parser, Debug, Clone)]
#[command(name = "aegis")]
#[command(about = "Train and run a harassment classifier for short text comments")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct AegisArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl AegisArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Output format for command results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Human,
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Normalize raw comment text
    Clean(CleanArgs),

    /// Balance class sizes by downsampling
    Balance(BalanceArgs),

    /// Stratified train/test split
    Split(SplitArgs),

    /// Train candidate models and persist the best one
    Train(TrainArgs),

    /// Classify comments with persisted artifacts
    Predict(PredictArgs),
}

/// Arguments for the clean stage
#[derive(Parser, Debug, Clone)]
pub struct CleanArgs {
    /// Raw dataset file (JSONL)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file for cleaned records
    #[arg(short, long, value_name = "OUTPUT", default_value = "data/processed/cleaned.jsonl")]
    pub output: PathBuf,
}

/// Arguments for the balance stage
#[derive(Parser, Debug, Clone)]
pub struct BalanceArgs {
    /// Cleaned dataset file (JSONL)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file for the balanced dataset
    #[arg(short, long, value_name = "OUTPUT", default_value = "data/processed/balanced.jsonl")]
    pub output: PathBuf,

    /// Random seed for downsampling
    #[arg(short, long, default_value = "42")]
    pub seed: u64,
}

/// Arguments for the split stage
#[derive(Parser, Debug, Clone)]
pub struct SplitArgs {
    /// Balanced dataset file (JSONL)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file for training records
    #[arg(long, value_name = "TRAIN", default_value = "data/processed/train.jsonl")]
    pub train_output: PathBuf,

    /// Output file for test records
    #[arg(long, value_name = "TEST", default_value = "data/processed/test.jsonl")]
    pub test_output: PathBuf,

    /// Fraction of each class held out for testing
    #[arg(short, long, default_value = "0.2")]
    pub test_fraction: f64,

    /// Random seed for the partition
    #[arg(short, long, default_value = "42")]
    pub seed: u64,
}

/// Arguments for the train stage
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Training records file (JSONL)
    #[arg(long, value_name = "TRAIN", default_value = "data/processed/train.jsonl")]
    pub train_input: PathBuf,

    /// Test records file (JSONL)
    #[arg(long, value_name = "TEST", default_value = "data/processed/test.jsonl")]
    pub test_input: PathBuf,

    /// Directory for persisted artifacts
    #[arg(short, long, value_name = "DIR", default_value = "models")]
    pub models_dir: PathBuf,

    /// Maximum vocabulary size
    #[arg(long, default_value = "5000")]
    pub max_features: usize,

    /// Random seed for training
    #[arg(short, long, default_value = "42")]
    pub seed: u64,
}

/// Arguments for the predict command
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Directory with persisted artifacts
    #[arg(short, long, value_name = "DIR", default_value = "models")]
    pub models_dir: PathBuf,

    /// Comments to classify
    #[arg(value_name = "TEXT")]
    pub texts: Vec<String>,

    /// Read comments from a file instead, one per line
    #[arg(long, value_name = "FILE", conflicts_with = "texts")]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train_defaults() {
        let args = AegisArgs::try_parse_from(["aegis", "train"]).unwrap();
        match args.command {
            Command::Train(train) => {
                assert_eq!(train.seed, 42);
                assert_eq!(train.max_features, 5000);
                assert_eq!(train.models_dir, PathBuf::from("models"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_predict_texts() {
        let args =
            AegisArgs::try_parse_from(["aegis", "predict", "you idiot", "nice day"]).unwrap();
        match args.command {
            Command::Predict(predict) => {
                assert_eq!(predict.texts.len(), 2);
                assert!(predict.file.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_verbosity_quiet_wins() {
        let args = AegisArgs::try_parse_from(["aegis", "-q", "-vvv", "train"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }
}
