//! English stopword list used by the TF-IDF vectorizer.

use std::collections::HashSet;

use lazy_static::lazy_static;

/// Fixed English stopword list.
///
/// Tokens in this list never enter the vocabulary and are removed from
/// the token stream before n-gram generation.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

lazy_static! {
    static ref STOPWORD_SET: HashSet<&'static str> = ENGLISH_STOPWORDS.iter().copied().collect();
}

/// Whether a token is an English stopword.
pub fn is_stopword(token: &str) -> bool {
    STOPWORD_SET.contains(token)
}
