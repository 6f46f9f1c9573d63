//! Candidate training, evaluation, and best-model selection.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::record::Category;
use crate::error::{AegisError, Result};
use crate::model::forest::{RandomForestConfig, RandomForestModel};
use crate::model::logistic::{
    LogisticRegressionConfig, LogisticRegressionModel, Solver,
};
use crate::model::metrics::{ConfusionMatrix, evaluate};
use crate::model::svm::{LinearSvmConfig, LinearSvmModel};
use crate::model::{FeatureMatrix, TrainedModel};

/// A model family that can be fit as one selection candidate.
pub trait Candidate {
    /// Name used in reports and artifact files.
    fn name(&self) -> &str;

    /// Fit on the training features and labels.
    fn fit(&self, x: &FeatureMatrix, y: &[Category]) -> Result<TrainedModel>;
}

/// Logistic regression with a cross-validated hyperparameter search.
pub struct LogisticCandidate {
    /// Grid of inverse regularization strengths.
    pub c_grid: Vec<f64>,
    /// Grid of solvers.
    pub solvers: Vec<Solver>,
    /// Number of stratified CV folds.
    pub folds: usize,
    /// Iteration cap passed to every fit.
    pub max_iter: usize,
    /// Seed for fold assignment and SGD ordering.
    pub seed: u64,
}

impl Default for LogisticCandidate {
    fn default() -> Self {
        Self {
            c_grid: vec![0.1, 1.0, 10.0],
            solvers: vec![Solver::GradientDescent, Solver::Sgd],
            folds: 5,
            max_iter: 500,
            seed: 42,
        }
    }
}

impl Candidate for LogisticCandidate {
    fn name(&self) -> &str {
        "LogisticRegression"
    }

    /// Grid search over `c_grid` x `solvers` by mean macro-F1 across
    /// stratified folds of the training data only, then a refit on the
    /// full training set with the winning configuration.
    fn fit(&self, x: &FeatureMatrix, y: &[Category]) -> Result<TrainedModel> {
        let folds = stratified_folds(y, self.folds, self.seed)?;

        let mut best: Option<(f64, LogisticRegressionConfig)> = None;
        for &c in &self.c_grid {
            for &solver in &self.solvers {
                let config = LogisticRegressionConfig {
                    c,
                    solver,
                    max_iter: self.max_iter,
                    seed: self.seed,
                    ..LogisticRegressionConfig::default()
                };

                let score = cross_validate(&config, x, y, &folds)?;
                log::debug!(
                    "grid search: C={c}, solver={} -> CV macro-F1 {score:.3}",
                    solver.name()
                );

                // Strict comparison: earlier grid entries win ties.
                if best.as_ref().is_none_or(|(s, _)| score > *s) {
                    best = Some((score, config));
                }
            }
        }

        let (score, config) = best.ok_or_else(|| AegisError::model("empty hyperparameter grid"))?;
        log::info!(
            "grid search winner: C={}, solver={} (CV macro-F1 {score:.3})",
            config.c,
            config.solver.name()
        );

        let model = LogisticRegressionModel::fit(&config, x, y)?;
        Ok(TrainedModel::LogisticRegression(model))
    }
}

/// Random forest candidate; fixed hyperparameters, no search.
pub struct ForestCandidate {
    pub config: RandomForestConfig,
}

impl Candidate for ForestCandidate {
    fn name(&self) -> &str {
        "RandomForest"
    }

    fn fit(&self, x: &FeatureMatrix, y: &[Category]) -> Result<TrainedModel> {
        let model = RandomForestModel::fit(&self.config, x, y)?;
        Ok(TrainedModel::RandomForest(model))
    }
}

/// Linear SVM candidate; fixed hyperparameters, no search.
pub struct SvmCandidate {
    pub config: LinearSvmConfig,
}

impl Candidate for SvmCandidate {
    fn name(&self) -> &str {
        "LinearSvm"
    }

    fn fit(&self, x: &FeatureMatrix, y: &[Category]) -> Result<TrainedModel> {
        let model = LinearSvmModel::fit(&self.config, x, y)?;
        Ok(TrainedModel::LinearSvm(model))
    }
}

/// The fixed candidate list in evaluation order.
pub fn default_candidates(seed: u64) -> Vec<Box<dyn Candidate>> {
    vec![
        Box::new(LogisticCandidate {
            seed,
            ..LogisticCandidate::default()
        }),
        Box::new(ForestCandidate {
            config: RandomForestConfig {
                seed,
                ..RandomForestConfig::default()
            },
        }),
        Box::new(SvmCandidate {
            config: LinearSvmConfig {
                seed,
                ..LinearSvmConfig::default()
            },
        }),
    ]
}

/// The winning model of a training run.
#[derive(Debug, Clone)]
pub struct SelectionResult {
    pub best_model: TrainedModel,
    pub best_model_name: String,
    pub best_score: f64,
}

/// Test-split scores for one candidate, kept for reporting only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateReport {
    pub name: String,
    pub accuracy: f64,
    pub macro_f1: f64,
    pub confusion: ConfusionMatrix,
}

/// Fit every candidate on the training split, evaluate on the test
/// split, and select the best by macro-F1.
///
/// Candidates are evaluated in list order with a strict `>` comparison,
/// so the first-evaluated candidate wins ties. A candidate whose fit
/// fails is logged and excluded; the run only fails with `NoViableModel`
/// when no candidate survives.
pub fn train_and_select(
    train_x: &FeatureMatrix,
    train_y: &[Category],
    test_x: &FeatureMatrix,
    test_y: &[Category],
    candidates: &[Box<dyn Candidate>],
) -> Result<(SelectionResult, Vec<CandidateReport>)> {
    let mut best: Option<SelectionResult> = None;
    let mut reports = Vec::new();

    for candidate in candidates {
        let model = match candidate.fit(train_x, train_y) {
            Ok(model) => model,
            Err(e) => {
                log::warn!("candidate {} failed to fit: {e}", candidate.name());
                continue;
            }
        };

        let predicted = model.predict_batch(test_x);
        let eval = evaluate(test_y, &predicted);
        log::info!(
            "{} -> accuracy: {:.3}, macro-F1: {:.3}",
            candidate.name(),
            eval.accuracy,
            eval.macro_f1
        );
        log::info!("confusion matrix:\n{}", eval.confusion);

        if best.as_ref().is_none_or(|b| eval.macro_f1 > b.best_score) {
            best = Some(SelectionResult {
                best_model: model,
                best_model_name: candidate.name().to_string(),
                best_score: eval.macro_f1,
            });
        }

        reports.push(CandidateReport {
            name: candidate.name().to_string(),
            accuracy: eval.accuracy,
            macro_f1: eval.macro_f1,
            confusion: eval.confusion,
        });
    }

    let result = best.ok_or_else(|| {
        AegisError::NoViableModel(format!(
            "all {} candidates failed to fit",
            candidates.len()
        ))
    })?;
    log::info!(
        "selected {} with macro-F1 {:.3}",
        result.best_model_name,
        result.best_score
    );

    Ok((result, reports))
}

/// Assign samples to stratified folds: per class, a seeded shuffle dealt
/// round-robin so every fold keeps the class balance of the input.
fn stratified_folds(y: &[Category], folds: usize, seed: u64) -> Result<Vec<usize>> {
    if folds < 2 {
        return Err(AegisError::invalid_operation(
            "cross-validation requires at least 2 folds",
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut assignment = vec![0usize; y.len()];

    for category in Category::ALL {
        let mut members: Vec<usize> = (0..y.len()).filter(|&i| y[i] == category).collect();
        if !members.is_empty() && members.len() < folds {
            return Err(AegisError::insufficient_data(
                category.name(),
                members.len(),
                folds,
            ));
        }
        members.shuffle(&mut rng);
        for (position, index) in members.into_iter().enumerate() {
            assignment[index] = position % folds;
        }
    }

    Ok(assignment)
}

/// Mean macro-F1 over held-out folds.
fn cross_validate(
    config: &LogisticRegressionConfig,
    x: &FeatureMatrix,
    y: &[Category],
    fold_assignment: &[usize],
) -> Result<f64> {
    let folds = fold_assignment.iter().max().copied().unwrap_or(0) + 1;
    let mut scores = Vec::with_capacity(folds);

    for fold in 0..folds {
        let mut train_x = Vec::new();
        let mut train_y = Vec::new();
        let mut held_x = Vec::new();
        let mut held_y = Vec::new();

        for i in 0..x.len() {
            if fold_assignment[i] == fold {
                held_x.push(x[i].clone());
                held_y.push(y[i]);
            } else {
                train_x.push(x[i].clone());
                train_y.push(y[i]);
            }
        }

        let model = LogisticRegressionModel::fit(config, &train_x, &train_y)?;
        let predicted: Vec<Category> = held_x
            .iter()
            .map(|row| crate::model::argmax_category(&model.predict_proba(row)))
            .collect();
        scores.push(evaluate(&held_y, &predicted).macro_f1);
    }

    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}
