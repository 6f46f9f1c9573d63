//! TF-IDF vectorizer with a bounded unigram/bigram vocabulary.

use std::collections::HashMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{AegisError, Result};
use crate::features::stopwords::is_stopword;

/// Configuration for the TF-IDF vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfConfig {
    /// Maximum vocabulary size.
    pub max_features: usize,
    /// Smallest n-gram length.
    pub ngram_min: usize,
    /// Largest n-gram length.
    pub ngram_max: usize,
}

impl Default for TfIdfConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            ngram_min: 1,
            ngram_max: 2,
        }
    }
}

/// A fitted TF-IDF feature space.
///
/// Immutable after fit: transforming new text never changes the
/// vocabulary, and out-of-vocabulary terms contribute zero weight.
/// Columns are ordered alphabetically by term; the ordering is part of
/// the serialized state, so a reloaded vectorizer produces byte-identical
/// vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    config: TfIdfConfig,
    /// Term -> column index, alphabetical by term.
    vocabulary: HashMap<String, usize>,
    /// Smoothed inverse document frequency per column.
    idf: Vec<f64>,
    /// Number of documents seen during fit.
    n_documents: usize,
}

impl TfIdfVectorizer {
    /// Fit a vectorizer on training documents.
    ///
    /// Builds unigram and bigram terms from stopword-filtered tokens,
    /// keeps at most `max_features` terms ranked by total corpus
    /// frequency (ties broken alphabetically), and computes the smoothed
    /// IDF `ln((1 + n) / (1 + df)) + 1` per retained term.
    ///
    /// Fails with `EmptyVocabulary` when no terms survive filtering.
    pub fn fit(config: TfIdfConfig, documents: &[String]) -> Result<Self> {
        if config.ngram_min == 0 || config.ngram_min > config.ngram_max {
            return Err(AegisError::invalid_operation(format!(
                "invalid n-gram range ({}, {})",
                config.ngram_min, config.ngram_max
            )));
        }
        if config.max_features == 0 {
            return Err(AegisError::invalid_operation(
                "max_features must be positive",
            ));
        }

        let n_documents = documents.len();
        let mut corpus_frequency: AHashMap<String, u64> = AHashMap::new();
        let mut document_frequency: AHashMap<String, usize> = AHashMap::new();

        for doc in documents {
            let terms = extract_terms(doc, &config);
            let mut seen: AHashMap<&str, ()> = AHashMap::new();
            for term in &terms {
                *corpus_frequency.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.as_str(), ()).is_none() {
                    *document_frequency.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }

        if corpus_frequency.is_empty() {
            return Err(AegisError::empty_vocabulary(
                "no terms remain after tokenization and stopword filtering",
            ));
        }

        // Keep the most frequent terms; alphabetical tie-break keeps the
        // selection deterministic.
        let mut ranked: Vec<(String, u64)> = corpus_frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(config.max_features);

        // Column order is alphabetical over the retained terms.
        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (index, term) in terms.into_iter().enumerate() {
            let df = document_frequency.get(&term).copied().unwrap_or(0);
            idf.push(((1.0 + n_documents as f64) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Ok(Self {
            config,
            vocabulary,
            idf,
            n_documents,
        })
    }

    /// Transform one document into a dense TF-IDF vector.
    ///
    /// Term counts are weighted by IDF and the vector is L2-normalized.
    /// A document with no in-vocabulary terms yields an all-zero vector.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.idf.len()];

        for term in extract_terms(document, &self.config) {
            if let Some(&index) = self.vocabulary.get(&term) {
                vector[index] += 1.0;
            }
        }

        for (index, value) in vector.iter_mut().enumerate() {
            *value *= self.idf[index];
        }

        let norm: f64 = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }

    /// Transform a batch of documents.
    pub fn transform_batch(&self, documents: &[String]) -> Vec<Vec<f64>> {
        documents.iter().map(|doc| self.transform(doc)).collect()
    }

    /// Number of columns in the feature space.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of documents the vectorizer was fit on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Retained terms in column order.
    pub fn terms(&self) -> Vec<&str> {
        let mut terms: Vec<(&str, usize)> = self
            .vocabulary
            .iter()
            .map(|(term, &index)| (term.as_str(), index))
            .collect();
        terms.sort_by_key(|&(_, index)| index);
        terms.into_iter().map(|(term, _)| term).collect()
    }
}

/// Tokenize a document and emit n-gram terms.
///
/// Tokens are whitespace-separated; stopwords are removed before n-gram
/// generation, so bigrams span the filtered stream.
fn extract_terms(document: &str, config: &TfIdfConfig) -> Vec<String> {
    let tokens: Vec<&str> = document
        .split_whitespace()
        .filter(|token| !is_stopword(token))
        .collect();

    let mut terms = Vec::new();
    for n in config.ngram_min..=config.ngram_max {
        if n == 0 || tokens.len() < n {
            continue;
        }
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_fit_builds_unigrams_and_bigrams() {
        let documents = docs(&["good game tonight", "bad game tonight"]);
        let vectorizer = TfIdfVectorizer::fit(TfIdfConfig::default(), &documents).unwrap();

        let terms = vectorizer.terms();
        assert!(terms.contains(&"game"));
        assert!(terms.contains(&"good game"));
        assert!(terms.contains(&"game tonight"));
    }

    #[test]
    fn test_fit_excludes_stopwords() {
        let documents = docs(&["the quick fox", "the lazy dog"]);
        let vectorizer = TfIdfVectorizer::fit(TfIdfConfig::default(), &documents).unwrap();

        for term in vectorizer.terms() {
            assert!(!term.split(' ').any(is_stopword), "stopword in {term:?}");
        }
    }

    #[test]
    fn test_fit_respects_max_features() {
        let documents = docs(&[
            "alpha beta gamma delta",
            "epsilon zeta eta theta",
            "iota kappa lambda mu",
        ]);
        let config = TfIdfConfig {
            max_features: 5,
            ..TfIdfConfig::default()
        };
        let vectorizer = TfIdfVectorizer::fit(config, &documents).unwrap();
        assert_eq!(vectorizer.vocabulary_size(), 5);
    }

    #[test]
    fn test_columns_are_alphabetical() {
        let documents = docs(&["zebra apple mango", "apple mango zebra"]);
        let vectorizer = TfIdfVectorizer::fit(TfIdfConfig::default(), &documents).unwrap();

        let terms = vectorizer.terms();
        let mut sorted = terms.clone();
        sorted.sort();
        assert_eq!(terms, sorted);
    }

    #[test]
    fn test_transform_out_of_vocabulary_is_zero() {
        let documents = docs(&["good game", "bad game"]);
        let vectorizer = TfIdfVectorizer::fit(TfIdfConfig::default(), &documents).unwrap();

        let vector = vectorizer.transform("completely unknown words");
        assert_eq!(vector.len(), vectorizer.vocabulary_size());
        assert!(vector.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let documents = docs(&["good game tonight", "bad game tonight", "good win"]);
        let vectorizer = TfIdfVectorizer::fit(TfIdfConfig::default(), &documents).unwrap();

        let vector = vectorizer.transform("good game");
        let norm: f64 = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9, "norm was {norm}");
    }

    #[test]
    fn test_transform_does_not_mutate_vocabulary() {
        let documents = docs(&["good game", "bad game"]);
        let vectorizer = TfIdfVectorizer::fit(TfIdfConfig::default(), &documents).unwrap();
        let size_before = vectorizer.vocabulary_size();

        vectorizer.transform("brand new words nobody saw");
        assert_eq!(vectorizer.vocabulary_size(), size_before);
    }

    #[test]
    fn test_fit_empty_vocabulary_fails() {
        let documents = docs(&["the a an", ""]);
        let result = TfIdfVectorizer::fit(TfIdfConfig::default(), &documents);
        assert!(matches!(result, Err(AegisError::EmptyVocabulary(_))));
    }

    #[test]
    fn test_serde_roundtrip_identical_vectors() {
        let documents = docs(&["good game tonight", "bad game tonight", "great win today"]);
        let vectorizer = TfIdfVectorizer::fit(TfIdfConfig::default(), &documents).unwrap();

        let bytes = bincode::serialize(&vectorizer).unwrap();
        let reloaded: TfIdfVectorizer = bincode::deserialize(&bytes).unwrap();

        for doc in ["good game", "unknown words", "great win tonight"] {
            assert_eq!(vectorizer.transform(doc), reloaded.transform(doc));
        }
    }
}
