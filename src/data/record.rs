//! Record types for labeled comments.

use serde::{Deserialize, Serialize};

use crate::error::AegisError;

/// Sentiment category of a comment.
///
/// Serialized as the integer labels used by the source dataset:
/// `-1` (negative, the harassment class), `0` (neutral), `1` (positive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Category {
    Negative,
    Neutral,
    Positive,
}

impl Category {
    /// All categories in the fixed iteration order used throughout the
    /// pipeline (balancing, stratification, confusion matrix axes).
    pub const ALL: [Category; 3] = [Category::Negative, Category::Neutral, Category::Positive];

    /// Number of categories.
    pub const COUNT: usize = 3;

    /// Dense index of this category (Negative=0, Neutral=1, Positive=2).
    pub fn index(&self) -> usize {
        match self {
            Category::Negative => 0,
            Category::Neutral => 1,
            Category::Positive => 2,
        }
    }

    /// Category for a dense index, if valid.
    pub fn from_index(index: usize) -> Option<Category> {
        Category::ALL.get(index).copied()
    }

    /// Integer label as stored in the dataset.
    pub fn label(&self) -> i64 {
        match self {
            Category::Negative => -1,
            Category::Neutral => 0,
            Category::Positive => 1,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Negative => "Negative",
            Category::Neutral => "Neutral",
            Category::Positive => "Positive",
        }
    }
}

impl TryFrom<i64> for Category {
    type Error = AegisError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Category::Negative),
            0 => Ok(Category::Neutral),
            1 => Ok(Category::Positive),
            other => Err(AegisError::data(format!(
                "invalid category label {other}, expected -1, 0, or 1"
            ))),
        }
    }
}

impl From<Category> for i64 {
    fn from(category: Category) -> Self {
        category.label()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A raw labeled comment as loaded from the source dataset.
///
/// Missing text deserializes as an empty string; records are never
/// dropped for lacking text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Raw comment text.
    #[serde(default)]
    pub text: String,
    /// Sentiment label.
    pub category: Category,
}

/// A comment after text normalization.
///
/// `clean_text` contains only lowercase alphanumerics and single spaces,
/// trimmed; it is derived deterministically from the raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    /// Normalized comment text.
    #[serde(default)]
    pub clean_text: String,
    /// Sentiment label.
    pub category: Category,
}

/// Anything carrying a category label.
pub trait Labeled {
    fn category(&self) -> Category;
}

impl Labeled for Record {
    fn category(&self) -> Category {
        self.category
    }
}

impl Labeled for CleanedRecord {
    fn category(&self) -> Category {
        self.category
    }
}
