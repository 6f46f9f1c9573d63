//! Error types for the Aegis pipeline.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`AegisError`] enum. The variants mirror the failure taxonomy of the
//! pipeline: fatal data-loading problems, degenerate class distributions,
//! an empty feature vocabulary, missing artifacts, and model selection
//! ending with no surviving candidate.

use std::io;

use thiserror::Error;

/// The main error type for Aegis operations.
#[derive(Error, Debug)]
pub enum AegisError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Source data is missing, unreadable, or empty.
    #[error("Data error: {0}")]
    Data(String),

    /// A label group is too small to balance or stratify.
    #[error("Insufficient data: class {class} has {count} records, at least {required} required")]
    InsufficientData {
        class: String,
        count: usize,
        required: usize,
    },

    /// No vocabulary terms survived fitting the feature extractor.
    #[error("Empty vocabulary: {0}")]
    EmptyVocabulary(String),

    /// A persisted artifact could not be resolved.
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    /// Every training candidate failed; selection has nothing to pick.
    #[error("No viable model: {0}")]
    NoViableModel(String),

    /// Model fitting or prediction errors.
    #[error("Model error: {0}")]
    Model(String),

    /// Artifact serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid operation or argument.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with AegisError.
pub type Result<T> = std::result::Result<T, AegisError>;

impl AegisError {
    /// Create a new data error.
    pub fn data<S: Into<String>>(msg: S) -> Self {
        AegisError::Data(msg.into())
    }

    /// Create a new insufficient-data error.
    pub fn insufficient_data<S: Into<String>>(class: S, count: usize, required: usize) -> Self {
        AegisError::InsufficientData {
            class: class.into(),
            count,
            required,
        }
    }

    /// Create a new empty-vocabulary error.
    pub fn empty_vocabulary<S: Into<String>>(msg: S) -> Self {
        AegisError::EmptyVocabulary(msg.into())
    }

    /// Create a new artifact-not-found error.
    pub fn artifact_not_found<S: Into<String>>(msg: S) -> Self {
        AegisError::ArtifactNotFound(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        AegisError::Model(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        AegisError::Serialization(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        AegisError::InvalidOperation(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        AegisError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = AegisError::data("missing file");
        assert_eq!(error.to_string(), "Data error: missing file");

        let error = AegisError::insufficient_data("Neutral", 0, 1);
        assert_eq!(
            error.to_string(),
            "Insufficient data: class Neutral has 0 records, at least 1 required"
        );

        let error = AegisError::empty_vocabulary("no terms after stopword filtering");
        assert_eq!(
            error.to_string(),
            "Empty vocabulary: no terms after stopword filtering"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let aegis_error = AegisError::from(io_error);

        match aegis_error {
            AegisError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
