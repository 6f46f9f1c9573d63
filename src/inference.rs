//! Inference over persisted artifacts.
//!
//! [`InferenceContext`] owns the loaded vectorizer and model. It is
//! constructed once at startup from an [`ArtifactStore`], so a
//! misconfigured deployment fails immediately rather than on the first
//! prediction. The context is read-only after construction and safe to
//! share across concurrent callers.
//!
//! Incoming text is always re-normalized before vectorizing, matching
//! what the feature space saw at training time.

use serde::{Deserialize, Serialize};

use crate::artifact::{ArtifactManifest, ArtifactStore};
use crate::data::record::Category;
use crate::error::Result;
use crate::features::TfIdfVectorizer;
use crate::model::TrainedModel;
use crate::normalize::normalize;

/// Prediction for one comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// The original (un-normalized) comment.
    pub comment: String,
    /// Whether the predicted category is the harassment class.
    pub is_harassment: bool,
    /// Probability of the predicted category, whichever it is.
    pub confidence: f64,
}

/// Aggregate statistics over one prediction batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStatistics {
    pub total: usize,
    pub harassment_count: usize,
    /// Percentage in `[0, 100]`.
    pub harassment_percentage: f64,
}

/// Predictions plus aggregate statistics for a batch of comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPrediction {
    pub predictions: Vec<Prediction>,
    pub statistics: BatchStatistics,
}

/// Description of the loaded artifacts, for health/startup reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextInfo {
    pub model_name: String,
    pub model_score: f64,
    pub vocabulary_size: usize,
}

/// Loaded model and vectorizer, ready to classify comments.
#[derive(Debug)]
pub struct InferenceContext {
    vectorizer: TfIdfVectorizer,
    model: TrainedModel,
    manifest: ArtifactManifest,
}

impl InferenceContext {
    /// Load both artifacts from the store.
    ///
    /// Fails with `ArtifactNotFound` when either artifact is missing.
    pub fn from_store(store: &ArtifactStore) -> Result<Self> {
        let vectorizer = store.load_vectorizer()?;
        let (model, manifest) = store.load_model()?;
        log::info!(
            "loaded {} (macro-F1 {:.3}) with {} vocabulary terms",
            manifest.model_name,
            manifest.score,
            vectorizer.vocabulary_size()
        );
        Ok(Self {
            vectorizer,
            model,
            manifest,
        })
    }

    /// Build a context from already-loaded artifacts.
    pub fn from_parts(
        vectorizer: TfIdfVectorizer,
        model: TrainedModel,
        manifest: ArtifactManifest,
    ) -> Self {
        Self {
            vectorizer,
            model,
            manifest,
        }
    }

    /// Classify one comment.
    pub fn predict_one(&self, comment: &str) -> Prediction {
        let clean = normalize(comment);
        let features = self.vectorizer.transform(&clean);
        let probabilities = self.model.predict_proba(&features);
        let predicted = crate::model::argmax_category(&probabilities);

        Prediction {
            comment: comment.to_string(),
            is_harassment: predicted == Category::Negative,
            confidence: probabilities[predicted.index()],
        }
    }

    /// Classify a batch of comments and compute aggregate statistics.
    pub fn predict_batch(&self, comments: &[String]) -> BatchPrediction {
        let predictions: Vec<Prediction> =
            comments.iter().map(|c| self.predict_one(c)).collect();

        let total = predictions.len();
        let harassment_count = predictions.iter().filter(|p| p.is_harassment).count();
        let harassment_percentage = if total > 0 {
            harassment_count as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        BatchPrediction {
            predictions,
            statistics: BatchStatistics {
                total,
                harassment_count,
                harassment_percentage,
            },
        }
    }

    /// Describe the loaded artifacts.
    pub fn describe(&self) -> ContextInfo {
        ContextInfo {
            model_name: self.manifest.model_name.clone(),
            model_score: self.manifest.score,
            vocabulary_size: self.vectorizer.vocabulary_size(),
        }
    }
}
