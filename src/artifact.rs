//! Persistence for the fitted model and vectorizer.
//!
//! Artifacts live in one directory: the winning model in a file whose
//! name embeds the model family, the vectorizer in a fixed file, and a
//! JSON manifest tying the `model` tag to the model file together with
//! the score and training timestamp.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AegisError, Result};
use crate::features::TfIdfVectorizer;
use crate::model::TrainedModel;
use crate::model::selection::SelectionResult;

/// Tag for the persisted best model.
pub const MODEL_TAG: &str = "model";
/// Tag for the persisted vectorizer.
pub const VECTORIZER_TAG: &str = "vectorizer";

const MANIFEST_FILE: &str = "manifest.json";
const VECTORIZER_FILE: &str = "tfidf_vectorizer.bin";

/// Manifest describing a persisted training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    /// File name of the serialized model, relative to the store root.
    pub model_file: String,
    /// Winning model family name.
    pub model_name: String,
    /// Test-split macro-F1 of the winner.
    pub score: f64,
    /// When the model was trained.
    pub trained_at: DateTime<Utc>,
}

/// Directory-backed store for the two pipeline artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    directory: PathBuf,
}

impl ArtifactStore {
    /// Open a store rooted at `directory`, creating it if needed.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    /// Store root directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Persist the winning model and write the manifest.
    ///
    /// Returns the path of the model file.
    pub fn save_model(&self, result: &SelectionResult) -> Result<PathBuf> {
        let model_file = format!("best_model_{}.bin", result.best_model_name);
        let path = self.directory.join(&model_file);
        write_bincode(&path, &result.best_model)?;

        let manifest = ArtifactManifest {
            model_file,
            model_name: result.best_model_name.clone(),
            score: result.best_score,
            trained_at: Utc::now(),
        };
        let manifest_json = serde_json::to_string_pretty(&manifest)?;
        fs::write(self.directory.join(MANIFEST_FILE), manifest_json)?;

        Ok(path)
    }

    /// Persist the fitted vectorizer.
    ///
    /// Returns the path of the vectorizer file.
    pub fn save_vectorizer(&self, vectorizer: &TfIdfVectorizer) -> Result<PathBuf> {
        let path = self.directory.join(VECTORIZER_FILE);
        write_bincode(&path, vectorizer)?;
        Ok(path)
    }

    /// Load the manifest for the `model` tag.
    pub fn load_manifest(&self) -> Result<ArtifactManifest> {
        let path = self.directory.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(AegisError::artifact_not_found(format!(
                "{MODEL_TAG}: no manifest at {}",
                path.display()
            )));
        }
        let json = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load the persisted best model and its manifest.
    pub fn load_model(&self) -> Result<(TrainedModel, ArtifactManifest)> {
        let manifest = self.load_manifest()?;
        let path = self.directory.join(&manifest.model_file);
        let model = read_bincode(&path, MODEL_TAG)?;
        Ok((model, manifest))
    }

    /// Load the persisted vectorizer.
    pub fn load_vectorizer(&self) -> Result<TfIdfVectorizer> {
        read_bincode(&self.directory.join(VECTORIZER_FILE), VECTORIZER_TAG)
    }
}

fn write_bincode<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = bincode::serialize(value)
        .map_err(|e| AegisError::serialization(format!("{}: {e}", path.display())))?;
    fs::write(path, bytes)?;
    Ok(())
}

fn read_bincode<T: DeserializeOwned>(path: &Path, tag: &str) -> Result<T> {
    if !path.exists() {
        return Err(AegisError::artifact_not_found(format!(
            "{tag}: missing file {}",
            path.display()
        )));
    }
    let bytes = fs::read(path)?;
    bincode::deserialize(&bytes)
        .map_err(|e| AegisError::serialization(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Category;
    use crate::features::TfIdfConfig;
    use crate::model::logistic::{LogisticRegressionConfig, LogisticRegressionModel};

    fn fitted_model() -> TrainedModel {
        let x = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.9, 0.1, 0.0],
            vec![0.1, 0.9, 0.0],
            vec![0.0, 0.1, 0.9],
        ];
        let y = vec![
            Category::Negative,
            Category::Neutral,
            Category::Positive,
            Category::Negative,
            Category::Neutral,
            Category::Positive,
        ];
        let config = LogisticRegressionConfig {
            max_iter: 100,
            ..LogisticRegressionConfig::default()
        };
        TrainedModel::LogisticRegression(LogisticRegressionModel::fit(&config, &x, &y).unwrap())
    }

    #[test]
    fn test_model_roundtrip_identical_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        let model = fitted_model();
        let result = SelectionResult {
            best_model: model.clone(),
            best_model_name: model.name().to_string(),
            best_score: 0.97,
        };

        let path = store.save_model(&result).unwrap();
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .contains("LogisticRegression")
        );

        let (loaded, manifest) = store.load_model().unwrap();
        assert_eq!(manifest.model_name, "LogisticRegression");
        assert_eq!(manifest.score, 0.97);

        for row in [[1.0, 0.0, 0.0], [0.2, 0.5, 0.3]] {
            assert_eq!(model.predict_proba(&row), loaded.predict_proba(&row));
            assert_eq!(model.predict(&row), loaded.predict(&row));
        }
    }

    #[test]
    fn test_vectorizer_roundtrip_identical_vectors() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        let documents = vec![
            "good game tonight".to_string(),
            "terrible awful behavior".to_string(),
        ];
        let vectorizer = TfIdfVectorizer::fit(TfIdfConfig::default(), &documents).unwrap();

        store.save_vectorizer(&vectorizer).unwrap();
        let loaded = store.load_vectorizer().unwrap();

        for doc in ["good game", "unseen words entirely", ""] {
            assert_eq!(vectorizer.transform(doc), loaded.transform(doc));
        }
    }

    #[test]
    fn test_load_from_empty_store_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        assert!(matches!(
            store.load_model(),
            Err(AegisError::ArtifactNotFound(_))
        ));
        assert!(matches!(
            store.load_vectorizer(),
            Err(AegisError::ArtifactNotFound(_))
        ));
    }

    #[test]
    fn test_missing_model_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        let model = fitted_model();
        let result = SelectionResult {
            best_model: model,
            best_model_name: "LogisticRegression".to_string(),
            best_score: 0.9,
        };
        let path = store.save_model(&result).unwrap();
        std::fs::remove_file(path).unwrap();

        assert!(matches!(
            store.load_model(),
            Err(AegisError::ArtifactNotFound(_))
        ));
    }
}
