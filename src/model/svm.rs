//! Linear support vector machine with calibrated probabilities.
//!
//! One binary SVM per category (one-vs-rest), trained with a
//! Pegasos-style subgradient solver. Class probabilities come from Platt
//! scaling: a sigmoid fit per binary problem on the training decision
//! values, normalized across categories.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::record::Category;
use crate::error::Result;
use crate::model::FeatureMatrix;
use crate::model::logistic::validate_training_input;

/// Hyperparameters for the linear SVM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvmConfig {
    /// Inverse regularization strength.
    pub c: f64,
    /// Training epochs per binary problem.
    pub max_iter: usize,
    /// Seed for sample ordering.
    pub seed: u64,
}

impl Default for LinearSvmConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 100,
            seed: 42,
        }
    }
}

/// Fitted sigmoid `p = 1 / (1 + exp(a * decision + b))`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlattSigmoid {
    a: f64,
    b: f64,
}

impl PlattSigmoid {
    fn probability(&self, decision: f64) -> f64 {
        1.0 / (1.0 + (self.a * decision + self.b).exp())
    }
}

/// A fitted one-vs-rest linear SVM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvmModel {
    /// Per-class weight vectors, `[n_classes][n_features]`.
    weights: Vec<Vec<f64>>,
    /// Per-class intercepts.
    intercepts: Vec<f64>,
    /// Per-class probability calibration.
    calibration: Vec<PlattSigmoid>,
    config: LinearSvmConfig,
}

impl LinearSvmModel {
    /// Fit on a feature matrix and aligned labels.
    pub fn fit(config: &LinearSvmConfig, x: &FeatureMatrix, y: &[Category]) -> Result<Self> {
        validate_training_input(x, y)?;

        let n_features = x[0].len();
        let mut weights = Vec::with_capacity(Category::COUNT);
        let mut intercepts = Vec::with_capacity(Category::COUNT);
        let mut calibration = Vec::with_capacity(Category::COUNT);

        for category in Category::ALL {
            let targets: Vec<f64> = y
                .iter()
                .map(|label| if *label == category { 1.0 } else { -1.0 })
                .collect();

            let seed = config.seed.wrapping_add(category.index() as u64);
            let (w, b) = fit_binary(config, x, &targets, n_features, seed);

            let decisions: Vec<f64> = x.iter().map(|row| decision(&w, b, row)).collect();
            calibration.push(fit_platt(&decisions, &targets));
            weights.push(w);
            intercepts.push(b);
        }

        Ok(Self {
            weights,
            intercepts,
            calibration,
            config: config.clone(),
        })
    }

    /// Uncalibrated decision value for one category.
    pub fn decision(&self, category: Category, features: &[f64]) -> f64 {
        let i = category.index();
        decision(&self.weights[i], self.intercepts[i], features)
    }

    /// Calibrated class probabilities, normalized across categories.
    pub fn predict_proba(&self, features: &[f64]) -> [f64; Category::COUNT] {
        let mut probs = [0.0; Category::COUNT];
        for category in Category::ALL {
            let d = self.decision(category, features);
            probs[category.index()] = self.calibration[category.index()].probability(d);
        }

        let sum: f64 = probs.iter().sum();
        if sum > 0.0 {
            for p in &mut probs {
                *p /= sum;
            }
        } else {
            probs = [1.0 / Category::COUNT as f64; Category::COUNT];
        }
        probs
    }
}

fn decision(weights: &[f64], intercept: f64, features: &[f64]) -> f64 {
    let mut score = intercept;
    for (w, &value) in weights.iter().zip(features.iter()) {
        if value != 0.0 {
            score += w * value;
        }
    }
    score
}

/// Pegasos subgradient descent on the hinge loss.
fn fit_binary(
    config: &LinearSvmConfig,
    x: &FeatureMatrix,
    targets: &[f64],
    n_features: usize,
    seed: u64,
) -> (Vec<f64>, f64) {
    let n_samples = x.len();
    let lambda = 1.0 / (config.c * n_samples as f64);

    let mut w = vec![0.0; n_features];
    let mut b = 0.0;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..n_samples).collect();
    let mut step = 0u64;

    for _ in 0..config.max_iter {
        order.shuffle(&mut rng);
        for &i in &order {
            step += 1;
            let eta = 1.0 / (lambda * step as f64);
            let margin = targets[i] * decision(&w, b, &x[i]);

            let shrink = 1.0 - eta * lambda;
            for weight in &mut w {
                *weight *= shrink;
            }
            if margin < 1.0 {
                for (weight, &value) in w.iter_mut().zip(x[i].iter()) {
                    if value != 0.0 {
                        *weight += eta * targets[i] * value;
                    }
                }
                b += eta * targets[i];
            }
        }
    }

    (w, b)
}

/// Fit the Platt sigmoid on training decision values.
///
/// Targets use the standard prior-corrected values so the sigmoid stays
/// finite even on perfectly separated data.
fn fit_platt(decisions: &[f64], targets: &[f64]) -> PlattSigmoid {
    let n_positive = targets.iter().filter(|&&t| t > 0.0).count() as f64;
    let n_negative = targets.len() as f64 - n_positive;
    let t_positive = (n_positive + 1.0) / (n_positive + 2.0);
    let t_negative = 1.0 / (n_negative + 2.0);

    let soft_targets: Vec<f64> = targets
        .iter()
        .map(|&t| if t > 0.0 { t_positive } else { t_negative })
        .collect();

    let mut a = -1.0;
    let mut b = 0.0;
    let learning_rate = 0.01;

    for _ in 0..500 {
        let mut grad_a = 0.0;
        let mut grad_b = 0.0;
        for (&d, &t) in decisions.iter().zip(soft_targets.iter()) {
            let p = 1.0 / (1.0 + (a * d + b).exp());
            // d(loss)/d(a*d + b) = t - p for this parameterization.
            grad_a += (t - p) * d;
            grad_b += t - p;
        }
        a -= learning_rate * grad_a / decisions.len() as f64;
        b -= learning_rate * grad_b / decisions.len() as f64;
    }

    PlattSigmoid { a, b }
}
