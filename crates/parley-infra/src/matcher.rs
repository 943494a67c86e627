//! Indel-ratio fuzzy matcher.
//!
//! Scores two strings by their longest common subsequence:
//! `100 * 2 * lcs / (len(a) + len(b))`, rounded. Both sides are normalized
//! first (lowercased, punctuation folded to spaces, whitespace collapsed), and
//! the best of the plain and the word-sorted comparison is kept so that
//! "partner add" still finds "add partner".

use parley_core::matcher::{FuzzyMatcher, Match};

#[derive(Debug, Default, Clone, Copy)]
pub struct IndelRatioMatcher;

impl IndelRatioMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Similarity of two strings on a 0..=100 scale.
    pub fn score(&self, a: &str, b: &str) -> u8 {
        let a = normalize(a);
        let b = normalize(b);
        if a.is_empty() || b.is_empty() {
            return 0;
        }
        let plain = ratio(&a, &b);
        if plain == 100 {
            return plain;
        }
        plain.max(ratio(&sort_words(&a), &sort_words(&b)))
    }
}

impl FuzzyMatcher for IndelRatioMatcher {
    fn best_match<'a>(&self, text: &str, candidates: &[&'a str]) -> Option<Match<'a>> {
        let mut best: Option<Match<'a>> = None;
        for &candidate in candidates {
            let score = self.score(text, candidate);
            if best.is_none_or(|b| score > b.score) {
                best = Some(Match { candidate, score });
            }
        }
        best
    }
}

fn normalize(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn sort_words(text: &str) -> String {
    let mut words: Vec<&str> = text.split(' ').collect();
    words.sort_unstable();
    words.join(" ")
}

fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }
    let lcs = lcs_len(&a, &b);
    ((200 * lcs) as f64 / total as f64).round() as u8
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
