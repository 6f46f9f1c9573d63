//! The end-to-end training pipeline.
//!
//! Stages run in a fixed order: clean -> balance -> split -> vectorize ->
//! train/select -> persist. Each stage is also callable on its own (the
//! CLI exposes one subcommand per stage) and reads/writes the dataset
//! files described in [`crate::data`].

use std::path::{Path, PathBuf};

use crate::artifact::ArtifactStore;
use crate::balance::balance;
use crate::data::io::{format_distribution, label_distribution, read_records, write_records};
use crate::data::record::{Category, CleanedRecord, Record};
use crate::error::Result;
use crate::features::{TfIdfConfig, TfIdfVectorizer};
use crate::model::selection::{
    CandidateReport, SelectionResult, default_candidates, train_and_select,
};
use crate::normalize::clean_records;
use crate::split::split;

/// Parameters shared across pipeline stages.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Seed for balancing, splitting, and model training.
    pub seed: u64,
    /// Fraction of the balanced data held out for testing.
    pub test_fraction: f64,
    /// Feature extraction parameters.
    pub tfidf: TfIdfConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.2,
            tfidf: TfIdfConfig::default(),
        }
    }
}

/// File layout of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    pub raw: PathBuf,
    pub cleaned: PathBuf,
    pub balanced: PathBuf,
    pub train: PathBuf,
    pub test: PathBuf,
    pub models_dir: PathBuf,
}

impl PipelinePaths {
    /// Conventional layout under a data root: processed files in
    /// `processed/`, artifacts in `models/`.
    pub fn under_root<P: AsRef<Path>>(root: P, raw: PathBuf) -> Self {
        let root = root.as_ref();
        Self {
            raw,
            cleaned: root.join("processed/cleaned.jsonl"),
            balanced: root.join("processed/balanced.jsonl"),
            train: root.join("processed/train.jsonl"),
            test: root.join("processed/test.jsonl"),
            models_dir: root.join("models"),
        }
    }
}

/// Clean stage: load raw records, normalize text, write cleaned records.
pub fn clean_stage(input: &Path, output: &Path) -> Result<Vec<CleanedRecord>> {
    let records: Vec<Record> = read_records(input)?;
    log::info!("loaded {} comments from {}", records.len(), input.display());
    log::info!(
        "label distribution: {}",
        format_distribution(&label_distribution(&records))
    );

    let cleaned = clean_records(&records);
    write_records(output, &cleaned)?;
    log::info!("cleaned records written to {}", output.display());
    Ok(cleaned)
}

/// Balance stage: downsample majority classes to the minority size.
pub fn balance_stage(input: &Path, output: &Path, seed: u64) -> Result<Vec<CleanedRecord>> {
    let records: Vec<CleanedRecord> = read_records(input)?;
    let balanced = balance(&records, seed)?;
    write_records(output, &balanced)?;
    log::info!(
        "balanced dataset: {}",
        format_distribution(&label_distribution(&balanced))
    );
    Ok(balanced)
}

/// Split stage: stratified train/test partition.
pub fn split_stage(
    input: &Path,
    train_output: &Path,
    test_output: &Path,
    test_fraction: f64,
    seed: u64,
) -> Result<(usize, usize)> {
    let records: Vec<CleanedRecord> = read_records(input)?;
    let result = split(&records, test_fraction, seed)?;
    write_records(train_output, &result.train)?;
    write_records(test_output, &result.test)?;
    log::info!(
        "train size: {}, test size: {}",
        result.train.len(),
        result.test.len()
    );
    Ok((result.train.len(), result.test.len()))
}

/// Outcome of the train stage.
#[derive(Debug)]
pub struct TrainOutcome {
    pub selection: SelectionResult,
    pub reports: Vec<CandidateReport>,
    pub vocabulary_size: usize,
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
}

/// Train stage: fit the vectorizer on training text, train and select
/// among the fixed candidates, persist both artifacts.
pub fn train_stage(
    train_input: &Path,
    test_input: &Path,
    store: &ArtifactStore,
    config: &PipelineConfig,
) -> Result<TrainOutcome> {
    let train: Vec<CleanedRecord> = read_records(train_input)?;
    let test: Vec<CleanedRecord> = read_records(test_input)?;

    let train_texts: Vec<String> = train.iter().map(|r| r.clean_text.clone()).collect();
    let test_texts: Vec<String> = test.iter().map(|r| r.clean_text.clone()).collect();
    let train_labels: Vec<Category> = train.iter().map(|r| r.category).collect();
    let test_labels: Vec<Category> = test.iter().map(|r| r.category).collect();

    let vectorizer = TfIdfVectorizer::fit(config.tfidf.clone(), &train_texts)?;
    log::info!("fitted vocabulary of {} terms", vectorizer.vocabulary_size());

    let train_features = vectorizer.transform_batch(&train_texts);
    let test_features = vectorizer.transform_batch(&test_texts);

    let candidates = default_candidates(config.seed);
    let (selection, reports) = train_and_select(
        &train_features,
        &train_labels,
        &test_features,
        &test_labels,
        &candidates,
    )?;

    let model_path = store.save_model(&selection)?;
    let vectorizer_path = store.save_vectorizer(&vectorizer)?;
    log::info!(
        "saved best model {} (macro-F1 {:.3}) to {}",
        selection.best_model_name,
        selection.best_score,
        model_path.display()
    );

    Ok(TrainOutcome {
        vocabulary_size: vectorizer.vocabulary_size(),
        selection,
        reports,
        model_path,
        vectorizer_path,
    })
}

/// Run the whole pipeline from raw records to persisted artifacts.
pub fn run(paths: &PipelinePaths, config: &PipelineConfig) -> Result<TrainOutcome> {
    clean_stage(&paths.raw, &paths.cleaned)?;
    balance_stage(&paths.cleaned, &paths.balanced, config.seed)?;
    split_stage(
        &paths.balanced,
        &paths.train,
        &paths.test,
        config.test_fraction,
        config.seed,
    )?;
    let store = ArtifactStore::new(&paths.models_dir)?;
    train_stage(&paths.train, &paths.test, &store, config)
}
