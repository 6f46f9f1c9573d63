//! Evaluation metrics: accuracy, macro-F1, confusion matrix.

use serde::{Deserialize, Serialize};

use crate::data::record::Category;

/// A 3x3 confusion matrix over the fixed category order.
///
/// Rows are actual categories, columns predicted, both indexed by
/// [`Category::index`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: [[u64; Category::COUNT]; Category::COUNT],
}

impl ConfusionMatrix {
    /// Build a confusion matrix from aligned actual/predicted labels.
    pub fn from_labels(actual: &[Category], predicted: &[Category]) -> Self {
        debug_assert_eq!(actual.len(), predicted.len());
        let mut counts = [[0u64; Category::COUNT]; Category::COUNT];
        for (a, p) in actual.iter().zip(predicted.iter()) {
            counts[a.index()][p.index()] += 1;
        }
        Self { counts }
    }

    /// Count of records with the given actual and predicted categories.
    pub fn count(&self, actual: Category, predicted: Category) -> u64 {
        self.counts[actual.index()][predicted.index()]
    }

    /// Total number of records.
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Fraction of records on the diagonal.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: u64 = (0..Category::COUNT).map(|i| self.counts[i][i]).sum();
        correct as f64 / total as f64
    }

    /// F1 score for one category (zero when undefined).
    pub fn f1(&self, category: Category) -> f64 {
        let i = category.index();
        let tp = self.counts[i][i] as f64;
        let fp: f64 = (0..Category::COUNT)
            .filter(|&a| a != i)
            .map(|a| self.counts[a][i] as f64)
            .sum();
        let fn_: f64 = (0..Category::COUNT)
            .filter(|&p| p != i)
            .map(|p| self.counts[i][p] as f64)
            .sum();

        let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
        let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
        if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        }
    }

    /// Unweighted mean of per-category F1 scores.
    pub fn macro_f1(&self) -> f64 {
        let sum: f64 = Category::ALL.iter().map(|c| self.f1(*c)).sum();
        sum / Category::COUNT as f64
    }
}

impl std::fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "actual\\predicted  Negative  Neutral  Positive")?;
        for actual in Category::ALL {
            write!(f, "{:<17}", actual.name())?;
            for predicted in Category::ALL {
                write!(f, "{:>9}", self.count(actual, predicted))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation of one candidate on the held-out test split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub accuracy: f64,
    pub macro_f1: f64,
    pub confusion: ConfusionMatrix,
}

/// Evaluate predictions against actual labels.
pub fn evaluate(actual: &[Category], predicted: &[Category]) -> Evaluation {
    let confusion = ConfusionMatrix::from_labels(actual, predicted);
    Evaluation {
        accuracy: confusion.accuracy(),
        macro_f1: confusion.macro_f1(),
        confusion,
    }
}
