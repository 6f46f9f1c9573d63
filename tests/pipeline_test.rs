//! End-to-end pipeline test on synthetic separable data.

use std::path::PathBuf;

use aegis::data::io::{label_distribution, read_records, write_records};
use aegis::data::record::{Category, CleanedRecord, Record};
use aegis::error::Result;
use aegis::pipeline::{self, PipelineConfig, PipelinePaths};

const NEGATIVE_WORDS: [&str; 6] = ["idiot", "stupid", "loser", "pathetic", "trash", "worthless"];
const NEUTRAL_WORDS: [&str; 6] = ["okay", "average", "normal", "regular", "standard", "plain"];
const POSITIVE_WORDS: [&str; 6] = [
    "wonderful",
    "amazing",
    "lovely",
    "fantastic",
    "brilliant",
    "delightful",
];

/// 300 raw records, 100 per class, each class with its own vocabulary.
/// Raw text carries the noise the cleaner must strip.
fn synthetic_records() -> Vec<Record> {
    let mut records = Vec::new();
    for (words, category) in [
        (NEGATIVE_WORDS, Category::Negative),
        (NEUTRAL_WORDS, Category::Neutral),
        (POSITIVE_WORDS, Category::Positive),
    ] {
        for i in 0..100 {
            let a = words[i % words.len()];
            let b = words[(i + 1) % words.len()];
            let c = words[(i + 2) % words.len()];
            let noise = match i % 3 {
                0 => " http://spam.example/x",
                1 => " @someone",
                _ => "!!",
            };
            records.push(Record {
                text: format!("You are {a} {b} {c}{noise}"),
                category,
            });
        }
    }
    records
}

fn run_pipeline(root: &std::path::Path) -> Result<(String, f64, PathBuf)> {
    let raw = root.join("raw.jsonl");
    write_records(&raw, &synthetic_records())?;

    let paths = PipelinePaths::under_root(root, raw);
    let config = PipelineConfig::default();
    let outcome = pipeline::run(&paths, &config)?;

    Ok((
        outcome.selection.best_model_name,
        outcome.selection.best_score,
        paths.test,
    ))
}

#[test]
fn test_end_to_end_selects_strong_model() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (name, score, test_path) = run_pipeline(dir.path())?;

    assert!(
        score > 0.9,
        "selected {name} with macro-F1 {score}, expected > 0.9"
    );

    // The intermediate files must reflect the balanced stratified split.
    let test: Vec<CleanedRecord> = read_records(&test_path)?;
    let counts = label_distribution(&test);
    assert_eq!(counts, [20, 20, 20]);

    Ok(())
}

#[test]
fn test_end_to_end_is_reproducible() -> Result<()> {
    let dir_a = tempfile::tempdir()?;
    let dir_b = tempfile::tempdir()?;

    let (name_a, score_a, _) = run_pipeline(dir_a.path())?;
    let (name_b, score_b, _) = run_pipeline(dir_b.path())?;

    assert_eq!(name_a, name_b);
    assert!(
        (score_a - score_b).abs() < 1e-12,
        "scores diverged: {score_a} vs {score_b}"
    );

    Ok(())
}

#[test]
fn test_intermediate_stages_chain() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let raw = dir.path().join("raw.jsonl");
    write_records(&raw, &synthetic_records())?;

    let cleaned_path = dir.path().join("cleaned.jsonl");
    let cleaned = pipeline::clean_stage(&raw, &cleaned_path)?;
    assert_eq!(cleaned.len(), 300);
    for record in &cleaned {
        assert!(!record.clean_text.contains("http"));
        assert!(!record.clean_text.contains('@'));
        assert!(!record.clean_text.contains('!'));
    }

    let balanced_path = dir.path().join("balanced.jsonl");
    let balanced = pipeline::balance_stage(&cleaned_path, &balanced_path, 42)?;
    assert_eq!(label_distribution(&balanced), [100, 100, 100]);

    let train_path = dir.path().join("train.jsonl");
    let test_path = dir.path().join("test.jsonl");
    let (train_size, test_size) =
        pipeline::split_stage(&balanced_path, &train_path, &test_path, 0.2, 42)?;
    assert_eq!(train_size + test_size, 300);
    assert_eq!(test_size, 60);

    Ok(())
}
