//! Classifier training, evaluation, and model selection.
//!
//! Three classifier families are trained on TF-IDF features: multinomial
//! logistic regression (with a cross-validated grid search), a random
//! forest, and a Platt-calibrated linear SVM. [`selection`] evaluates
//! each candidate on the held-out test split and picks the winner by
//! macro-averaged F1.

pub mod forest;
pub mod logistic;
pub mod metrics;
pub mod selection;
pub mod svm;

use serde::{Deserialize, Serialize};

use crate::data::record::Category;

/// Dense feature matrix: one row per document.
pub type FeatureMatrix = Vec<Vec<f64>>;

/// A fitted classifier, one of the candidate families.
///
/// All variants expose point predictions and class probabilities over
/// the fixed [`Category::ALL`] axis order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrainedModel {
    LogisticRegression(logistic::LogisticRegressionModel),
    RandomForest(forest::RandomForestModel),
    LinearSvm(svm::LinearSvmModel),
}

impl TrainedModel {
    /// Candidate family name, as used in artifact file names.
    pub fn name(&self) -> &'static str {
        match self {
            TrainedModel::LogisticRegression(_) => "LogisticRegression",
            TrainedModel::RandomForest(_) => "RandomForest",
            TrainedModel::LinearSvm(_) => "LinearSvm",
        }
    }

    /// Predict the category of one feature vector.
    pub fn predict(&self, features: &[f64]) -> Category {
        argmax_category(&self.predict_proba(features))
    }

    /// Class probabilities for one feature vector, in [`Category::ALL`]
    /// order. Probabilities are non-negative and sum to one.
    pub fn predict_proba(&self, features: &[f64]) -> [f64; Category::COUNT] {
        match self {
            TrainedModel::LogisticRegression(model) => model.predict_proba(features),
            TrainedModel::RandomForest(model) => model.predict_proba(features),
            TrainedModel::LinearSvm(model) => model.predict_proba(features),
        }
    }

    /// Predict categories for a batch of feature vectors.
    pub fn predict_batch(&self, features: &FeatureMatrix) -> Vec<Category> {
        features.iter().map(|row| self.predict(row)).collect()
    }
}

/// Category with the highest probability; ties resolve to the earliest
/// category in [`Category::ALL`] order.
pub(crate) fn argmax_category(probabilities: &[f64; Category::COUNT]) -> Category {
    let mut best = 0;
    for (index, &p) in probabilities.iter().enumerate() {
        if p > probabilities[best] {
            best = index;
        }
    }
    Category::ALL[best]
}
