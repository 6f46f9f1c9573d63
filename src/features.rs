//! TF-IDF feature extraction.
//!
//! The feature space is fit once per training run on training text only,
//! frozen afterwards, and persisted alongside the model so inference
//! reproduces byte-identical feature vectors.

pub mod stopwords;
pub mod tfidf;

pub use tfidf::{TfIdfConfig, TfIdfVectorizer};
