//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{AegisArgs, OutputFormat};
use crate::error::Result;
use crate::inference::{BatchStatistics, Prediction};
use crate::model::selection::CandidateReport;

/// Result structure for the clean stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct CleanResult {
    pub records: usize,
    pub output: String,
    /// Counts in Negative, Neutral, Positive order.
    pub label_counts: [usize; 3],
}

/// Result structure for the balance stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResult {
    pub records_per_class: usize,
    pub total_records: usize,
    pub output: String,
}

/// Result structure for the split stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct SplitResult {
    pub train_size: usize,
    pub test_size: usize,
    pub train_output: String,
    pub test_output: String,
}

/// Result structure for the train stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResult {
    pub candidates: Vec<CandidateReport>,
    pub best_model: String,
    pub best_macro_f1: f64,
    pub vocabulary_size: usize,
    pub model_path: String,
    pub vectorizer_path: String,
    pub duration_ms: u64,
}

/// Result structure for the predict command.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResult {
    pub model_name: String,
    pub predictions: Vec<Prediction>,
    pub statistics: BatchStatistics,
    pub duration_ms: u64,
}

/// Print a command result in the selected output format.
///
/// Human mode prints the message; JSON mode prints the serialized value
/// (pretty when requested) for machine consumption.
pub fn output_result<T: Serialize>(message: &str, value: &T, args: &AegisArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
            }
        }
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(value)?
            } else {
                serde_json::to_string(value)?
            };
            println!("{json}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_result_serializes() {
        let result = TrainResult {
            candidates: Vec::new(),
            best_model: "LogisticRegression".to_string(),
            best_macro_f1: 0.93,
            vocabulary_size: 4200,
            model_path: "models/best_model_LogisticRegression.bin".to_string(),
            vectorizer_path: "models/tfidf_vectorizer.bin".to_string(),
            duration_ms: 1234,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"best_model\":\"LogisticRegression\""));
    }
}
