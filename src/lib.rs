//! # Aegis
//!
//! A harassment-comment classification pipeline for Rust.
//!
//! ## Features
//!
//! - Deterministic text normalization, class balancing, and stratified
//!   splitting, all driven by explicit seeds
//! - TF-IDF feature extraction with a bounded unigram/bigram vocabulary
//! - Three classifier families (logistic regression with grid search,
//!   random forest, calibrated linear SVM) with macro-F1 model selection
//! - Persisted model/vectorizer artifacts and a read-only inference
//!   context built from them

pub mod artifact;
pub mod balance;
pub mod cli;
pub mod data;
pub mod error;
pub mod features;
pub mod inference;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod split;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
