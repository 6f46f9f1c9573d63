//! Command implementations for the Aegis CLI.

use std::fs;
use std::time::Instant;

use crate::artifact::ArtifactStore;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::data::io::label_distribution;
use crate::error::{AegisError, Result};
use crate::features::TfIdfConfig;
use crate::inference::InferenceContext;
use crate::pipeline::{self, PipelineConfig};

/// Execute a CLI command.
pub fn execute_command(args: AegisArgs) -> Result<()> {
    match &args.command {
        Command::Clean(clean_args) => clean(clean_args.clone(), &args),
        Command::Balance(balance_args) => balance(balance_args.clone(), &args),
        Command::Split(split_args) => split(split_args.clone(), &args),
        Command::Train(train_args) => train(train_args.clone(), &args),
        Command::Predict(predict_args) => predict(predict_args.clone(), &args),
    }
}

fn clean(args: CleanArgs, cli_args: &AegisArgs) -> Result<()> {
    let cleaned = pipeline::clean_stage(&args.input, &args.output)?;
    let counts = label_distribution(&cleaned);

    output_result(
        &format!(
            "cleaned {} records into {}",
            cleaned.len(),
            args.output.display()
        ),
        &CleanResult {
            records: cleaned.len(),
            output: args.output.display().to_string(),
            label_counts: counts,
        },
        cli_args,
    )
}

fn balance(args: BalanceArgs, cli_args: &AegisArgs) -> Result<()> {
    let balanced = pipeline::balance_stage(&args.input, &args.output, args.seed)?;

    output_result(
        &format!(
            "balanced dataset of {} records written to {}",
            balanced.len(),
            args.output.display()
        ),
        &BalanceResult {
            records_per_class: balanced.len() / 3,
            total_records: balanced.len(),
            output: args.output.display().to_string(),
        },
        cli_args,
    )
}

fn split(args: SplitArgs, cli_args: &AegisArgs) -> Result<()> {
    let (train_size, test_size) = pipeline::split_stage(
        &args.input,
        &args.train_output,
        &args.test_output,
        args.test_fraction,
        args.seed,
    )?;

    output_result(
        &format!("train size: {train_size}, test size: {test_size}"),
        &SplitResult {
            train_size,
            test_size,
            train_output: args.train_output.display().to_string(),
            test_output: args.test_output.display().to_string(),
        },
        cli_args,
    )
}

fn train(args: TrainArgs, cli_args: &AegisArgs) -> Result<()> {
    let config = PipelineConfig {
        seed: args.seed,
        tfidf: TfIdfConfig {
            max_features: args.max_features,
            ..TfIdfConfig::default()
        },
        ..PipelineConfig::default()
    };
    let store = ArtifactStore::new(&args.models_dir)?;

    let start = Instant::now();
    let outcome = pipeline::train_stage(&args.train_input, &args.test_input, &store, &config)?;
    let duration_ms = start.elapsed().as_millis() as u64;

    output_result(
        &format!(
            "best model: {} (macro-F1 {:.3}), saved to {}",
            outcome.selection.best_model_name,
            outcome.selection.best_score,
            outcome.model_path.display()
        ),
        &TrainResult {
            candidates: outcome.reports,
            best_model: outcome.selection.best_model_name.clone(),
            best_macro_f1: outcome.selection.best_score,
            vocabulary_size: outcome.vocabulary_size,
            model_path: outcome.model_path.display().to_string(),
            vectorizer_path: outcome.vectorizer_path.display().to_string(),
            duration_ms,
        },
        cli_args,
    )
}

fn predict(args: PredictArgs, cli_args: &AegisArgs) -> Result<()> {
    let comments = if let Some(file) = &args.file {
        fs::read_to_string(file)?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.to_string())
            .collect()
    } else {
        args.texts.clone()
    };
    if comments.is_empty() {
        return Err(AegisError::invalid_operation("no comments to classify"));
    }

    // Artifacts are resolved before any prediction runs.
    let store = ArtifactStore::new(&args.models_dir)?;
    let context = InferenceContext::from_store(&store)?;
    let info = context.describe();

    let start = Instant::now();
    let batch = context.predict_batch(&comments);
    let duration_ms = start.elapsed().as_millis() as u64;

    if cli_args.output_format == OutputFormat::Human && cli_args.verbosity() > 0 {
        for prediction in &batch.predictions {
            let flag = if prediction.is_harassment {
                "HARASSMENT"
            } else {
                "ok"
            };
            println!(
                "[{flag}] ({:.2}) {}",
                prediction.confidence, prediction.comment
            );
        }
    }

    output_result(
        &format!(
            "{} of {} comments flagged ({:.1}%) in {duration_ms} ms",
            batch.statistics.harassment_count,
            batch.statistics.total,
            batch.statistics.harassment_percentage
        ),
        &PredictResult {
            model_name: info.model_name,
            predictions: batch.predictions,
            statistics: batch.statistics,
            duration_ms,
        },
        cli_args,
    )
}
