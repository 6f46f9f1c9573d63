//! Text normalization for comments.
//!
//! Normalization is a pure, total function applied identically at
//! training time and at the inference boundary, so the feature space
//! always sees text in the same shape. Steps, in order: lowercase,
//! strip URLs, strip `@mention` tokens, drop everything outside
//! `[a-z0-9 ]`, collapse whitespace, trim.

use lazy_static::lazy_static;
use regex::Regex;

use crate::data::record::{CleanedRecord, Record};

lazy_static! {
    static ref URL_RE: Regex = Regex::new(r"(?:https?://|www\.)\S+").unwrap();
    static ref MENTION_RE: Regex = Regex::new(r"@\w+").unwrap();
    static ref NON_ALNUM_RE: Regex = Regex::new(r"[^a-z0-9\s]").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Normalize raw comment text.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let text = text.to_lowercase();
    let text = URL_RE.replace_all(&text, "");
    let text = MENTION_RE.replace_all(&text, "");
    let text = NON_ALNUM_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Normalize a batch of raw records into cleaned records.
///
/// Records whose text normalizes to the empty string are kept.
pub fn clean_records(records: &[Record]) -> Vec<CleanedRecord> {
    records
        .iter()
        .map(|record| CleanedRecord {
            clean_text: normalize(&record.text),
            category: record.category,
        })
        .collect()
}
