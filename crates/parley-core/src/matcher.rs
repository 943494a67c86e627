//! FuzzyMatcher trait for scoring free text against known phrases.
//!
//! Defined in parley-core so the dialog engine can recognize subjects and
//! cancellation phrases without coupling to a specific scoring algorithm.
//! The `IndelRatioMatcher` adapter lives in parley-infra.

/// Best candidate for a piece of text, with its similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub candidate: &'a str,
    /// Similarity on a 0..=100 scale, 100 being identical.
    pub score: u8,
}

/// Abstraction over fuzzy string scoring.
pub trait FuzzyMatcher: Send + Sync {
    /// Return the highest-scoring candidate for `text`.
    ///
    /// Returns `None` only when `candidates` is empty. Ties resolve to the
    /// candidate that appears first.
    fn best_match<'a>(&self, text: &str, candidates: &[&'a str]) -> Option<Match<'a>>;
}
