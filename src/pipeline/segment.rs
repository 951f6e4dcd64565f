//! Word segmentation for glued lowercase runs ("thequickbrownfox").
//!
//! Segmentation is a soft dependency of the repair pass: the default
//! [`NoSegmenter`] hands every token back untouched, so repair behaves the
//! same whether or not a dictionary is configured.
//!
//! [`DictionarySegmenter`] uses a frequency-ranked word list and Zipf's law:
//! the word at rank `r` (0-based) in a list of `N` words costs
//! `ln((r + 1) · ln N)`, and dynamic programming picks the split with the
//! lowest total cost.

use crate::error::SummarizeError;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Splits a run of glued letters into probable words.
pub trait WordSegmenter: Send + Sync {
    /// Return the words of `token`, in order. Returning `vec![token]`
    /// means "no better split".
    fn split(&self, token: &str) -> Vec<String>;
}

/// Pass-through segmenter used when no dictionary is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSegmenter;

impl WordSegmenter for NoSegmenter {
    fn split(&self, token: &str) -> Vec<String> {
        vec![token.to_string()]
    }
}

/// Zipf-cost dictionary segmenter.
#[derive(Debug, Clone)]
pub struct DictionarySegmenter {
    costs: HashMap<String, f64>,
    /// Longest dictionary word, in characters.
    max_len: usize,
}

impl DictionarySegmenter {
    /// Build from words ordered most-frequent first. Repeated words keep
    /// their first (cheapest) rank.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ranked: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let log_n = (ranked.len().max(2) as f64).ln();

        let mut costs = HashMap::with_capacity(ranked.len());
        let mut max_len = 0;
        for (rank, word) in ranked.into_iter().enumerate() {
            max_len = max_len.max(word.chars().count());
            costs
                .entry(word)
                .or_insert_with(|| ((rank as f64 + 1.0) * log_n).ln());
        }
        Self { costs, max_len }
    }

    /// Load a word list with one word per line, most frequent first.
    /// Blank lines and lines starting with `#` are ignored.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SummarizeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SummarizeError::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => SummarizeError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => SummarizeError::Internal(format!(
                "Failed to read word list {}: {}",
                path.display(),
                e
            )),
        })?;
        let seg = Self::from_words(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        );
        debug!("Loaded {} segmentation words from {}", seg.len(), path.display());
        Ok(seg)
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    fn word_cost(&self, word: &str) -> f64 {
        self.costs
            .get(&word.to_lowercase())
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Cheapest split of `token`, or `None` when some part of it matches
    /// no dictionary word.
    fn segment(&self, token: &str) -> Option<Vec<String>> {
        if token.is_empty() || self.max_len == 0 {
            return None;
        }
        let bounds: Vec<usize> = token
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(token.len()))
            .collect();
        let n = bounds.len() - 1;

        // cost[i]: cheapest split of the first i chars; step[i]: length of its last word.
        let mut cost = vec![f64::INFINITY; n + 1];
        let mut step = vec![0usize; n + 1];
        cost[0] = 0.0;
        for i in 1..=n {
            for k in 1..=i.min(self.max_len) {
                let prev = cost[i - k];
                if !prev.is_finite() {
                    continue;
                }
                let c = prev + self.word_cost(&token[bounds[i - k]..bounds[i]]);
                if c < cost[i] {
                    cost[i] = c;
                    step[i] = k;
                }
            }
        }
        if !cost[n].is_finite() {
            return None;
        }

        let mut words = Vec::new();
        let mut i = n;
        while i > 0 {
            let k = step[i];
            words.push(token[bounds[i - k]..bounds[i]].to_string());
            i -= k;
        }
        words.reverse();
        Some(words)
    }
}

impl WordSegmenter for DictionarySegmenter {
    fn split(&self, token: &str) -> Vec<String> {
        self.segment(token)
            .unwrap_or_else(|| vec![token.to_string()])
    }
}
