//! Multinomial logistic regression.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::record::Category;
use crate::error::{AegisError, Result};
use crate::model::FeatureMatrix;

/// Convex solver used to fit the softmax objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Solver {
    /// Full-batch gradient descent.
    GradientDescent,
    /// Seeded stochastic gradient descent with per-epoch reshuffling.
    Sgd,
}

impl Solver {
    pub fn name(&self) -> &'static str {
        match self {
            Solver::GradientDescent => "gradient_descent",
            Solver::Sgd => "sgd",
        }
    }
}

/// Hyperparameters for logistic regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionConfig {
    /// Inverse regularization strength; larger means weaker L2 penalty.
    pub c: f64,
    /// Optimization algorithm.
    pub solver: Solver,
    /// Iteration cap (batch steps, or epochs for SGD).
    pub max_iter: usize,
    /// Base learning rate.
    pub learning_rate: f64,
    /// Seed for SGD sample ordering.
    pub seed: u64,
}

impl Default for LogisticRegressionConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            solver: Solver::GradientDescent,
            max_iter: 500,
            learning_rate: 0.5,
            seed: 42,
        }
    }
}

/// A fitted multinomial logistic regression model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionModel {
    /// Per-class weight vectors, `[n_classes][n_features]`.
    weights: Vec<Vec<f64>>,
    /// Per-class intercepts.
    intercepts: Vec<f64>,
    config: LogisticRegressionConfig,
}

impl LogisticRegressionModel {
    /// Fit on a feature matrix and aligned labels.
    ///
    /// Fails with a `Model` error on empty or single-class input; model
    /// selection treats that as a failed candidate, not a fatal run.
    pub fn fit(
        config: &LogisticRegressionConfig,
        x: &FeatureMatrix,
        y: &[Category],
    ) -> Result<Self> {
        validate_training_input(x, y)?;

        let n_samples = x.len();
        let n_features = x[0].len();
        // L2 penalty scaled so the objective matches mean cross-entropy
        // plus ||w||^2 / (2 C n).
        let l2 = 1.0 / (config.c * n_samples as f64);

        let mut weights = vec![vec![0.0; n_features]; Category::COUNT];
        let mut intercepts = vec![0.0; Category::COUNT];

        match config.solver {
            Solver::GradientDescent => {
                for _ in 0..config.max_iter {
                    let mut grad_w = vec![vec![0.0; n_features]; Category::COUNT];
                    let mut grad_b = vec![0.0; Category::COUNT];

                    for (row, label) in x.iter().zip(y.iter()) {
                        let probs = softmax_scores(&weights, &intercepts, row);
                        for class in 0..Category::COUNT {
                            let diff = probs[class]
                                - if label.index() == class { 1.0 } else { 0.0 };
                            grad_b[class] += diff;
                            for (j, &value) in row.iter().enumerate() {
                                if value != 0.0 {
                                    grad_w[class][j] += diff * value;
                                }
                            }
                        }
                    }

                    let scale = config.learning_rate / n_samples as f64;
                    for class in 0..Category::COUNT {
                        intercepts[class] -= scale * grad_b[class];
                        for j in 0..n_features {
                            weights[class][j] -= scale * grad_w[class][j]
                                + config.learning_rate * l2 * weights[class][j];
                        }
                    }
                }
            }
            Solver::Sgd => {
                let mut rng = StdRng::seed_from_u64(config.seed);
                let mut order: Vec<usize> = (0..n_samples).collect();

                for epoch in 0..config.max_iter {
                    order.shuffle(&mut rng);
                    let lr = config.learning_rate / (1.0 + 0.01 * epoch as f64);

                    for &i in &order {
                        let row = &x[i];
                        let probs = softmax_scores(&weights, &intercepts, row);
                        for class in 0..Category::COUNT {
                            let diff = probs[class]
                                - if y[i].index() == class { 1.0 } else { 0.0 };
                            intercepts[class] -= lr * diff;
                            for (j, &value) in row.iter().enumerate() {
                                if value != 0.0 {
                                    weights[class][j] -=
                                        lr * (diff * value + l2 * weights[class][j]);
                                }
                            }
                        }
                    }
                }
            }
        }

        Ok(Self {
            weights,
            intercepts,
            config: config.clone(),
        })
    }

    /// Class probabilities via softmax over the linear scores.
    pub fn predict_proba(&self, features: &[f64]) -> [f64; Category::COUNT] {
        softmax_scores(&self.weights, &self.intercepts, features)
    }

    /// Number of features the model was fit on.
    pub fn n_features(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    /// Hyperparameters the model was fit with.
    pub fn config(&self) -> &LogisticRegressionConfig {
        &self.config
    }
}

/// Check the shape constraints shared by all candidate fits.
pub(crate) fn validate_training_input(x: &FeatureMatrix, y: &[Category]) -> Result<()> {
    if x.is_empty() {
        return Err(AegisError::model("training data is empty"));
    }
    if x.len() != y.len() {
        return Err(AegisError::model(format!(
            "feature/label length mismatch: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    let n_features = x[0].len();
    if n_features == 0 {
        return Err(AegisError::model("feature vectors have zero dimensions"));
    }
    if x.iter().any(|row| row.len() != n_features) {
        return Err(AegisError::model("feature rows have inconsistent dimensions"));
    }

    let mut present = [false; Category::COUNT];
    for label in y {
        present[label.index()] = true;
    }
    if present.iter().filter(|&&p| p).count() < 2 {
        return Err(AegisError::model(
            "training data contains fewer than two classes",
        ));
    }
    Ok(())
}

fn softmax_scores(
    weights: &[Vec<f64>],
    intercepts: &[f64],
    features: &[f64],
) -> [f64; Category::COUNT] {
    let mut scores = [0.0; Category::COUNT];
    for class in 0..Category::COUNT {
        let mut score = intercepts[class];
        for (w, &value) in weights[class].iter().zip(features.iter()) {
            if value != 0.0 {
                score += w * value;
            }
        }
        scores[class] = score;
    }

    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for score in &mut scores {
        *score = (*score - max).exp();
        sum += *score;
    }
    for score in &mut scores {
        *score /= sum;
    }
    scores
}
