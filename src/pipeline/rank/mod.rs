//! Extractive sentence rankers.
//!
//! Each ranker scores the sentences of a [`ParsedDocument`] and returns the
//! indices of the `budget` best, best first. Rankers are independent: the
//! local ensemble calls each one separately and skips any that returns a
//! [`RankError`].

pub mod lexrank;
pub mod lsa;
pub mod textrank;

pub use lexrank::LexRank;
pub use lsa::Lsa;
pub use textrank::TextRank;

use crate::error::RankError;
use crate::pipeline::tokenize::{self, Sentence};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Power iterations allowed before a ranker reports non-convergence.
pub(crate) const MAX_ITERATIONS: usize = 10_000;

/// The ranking algorithms in the ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    LexRank,
    TextRank,
    Lsa,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::LexRank => "lexrank",
            Algorithm::TextRank => "textrank",
            Algorithm::Lsa => "lsa",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document tokenized once and shared by every ranker.
#[derive(Debug, Clone)]
pub struct ParsedDocument<'a> {
    sentences: Vec<Sentence<'a>>,
    words: Vec<Vec<String>>,
}

impl<'a> ParsedDocument<'a> {
    pub fn parse(text: &'a str) -> Self {
        let sentences = tokenize::sentences(text);
        let words = sentences.iter().map(|s| tokenize::words(s.text)).collect();
        Self { sentences, words }
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn sentence(&self, index: usize) -> &'a str {
        self.sentences[index].text
    }

    pub fn sentences(&self) -> &[Sentence<'a>] {
        &self.sentences
    }

    /// Lowercased words of sentence `index`, in order, repeats kept.
    pub fn words(&self, index: usize) -> &[String] {
        &self.words[index]
    }

    pub fn all_words(&self) -> &[Vec<String>] {
        &self.words
    }

    /// True when no sentence contains a single word.
    pub fn has_no_words(&self) -> bool {
        self.words.iter().all(Vec::is_empty)
    }
}

/// Scores sentences and picks the best ones.
pub trait SentenceRanker: Send + Sync {
    fn algorithm(&self) -> Algorithm;

    /// Indices of at most `budget` sentences, best first.
    fn rank(&self, doc: &ParsedDocument<'_>, budget: usize) -> Result<Vec<usize>, RankError>;
}

/// The ensemble in pool order: LexRank, TextRank, LSA.
pub fn default_rankers() -> Vec<Box<dyn SentenceRanker>> {
    vec![Box::new(LexRank), Box::new(TextRank), Box::new(Lsa)]
}

/// Indices of the `budget` highest scores, best first. Equal scores keep
/// document order.
pub(crate) fn top_indices(scores: &[f64], budget: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order.truncate(budget);
    order
}

/// Shared guard: an empty document ranks to nothing, a wordless one is an error.
pub(crate) fn check_vocabulary(
    doc: &ParsedDocument<'_>,
    algorithm: Algorithm,
) -> Result<bool, RankError> {
    if doc.is_empty() {
        return Ok(false);
    }
    if doc.has_no_words() {
        return Err(RankError::EmptyVocabulary {
            algorithm: algorithm.to_string(),
        });
    }
    Ok(true)
}

/// Iterate `p ← Mᵀ p` from the uniform vector until the L2 step is at most
/// `epsilon`. `matrix` is row-major and square.
pub(crate) fn power_method(
    matrix: &[Vec<f64>],
    epsilon: f64,
    algorithm: Algorithm,
) -> Result<Vec<f64>, RankError> {
    let n = matrix.len();
    let mut p = vec![1.0 / n as f64; n];
    for _ in 0..MAX_ITERATIONS {
        let next: Vec<f64> = (0..n)
            .map(|col| (0..n).map(|row| matrix[row][col] * p[row]).sum())
            .collect();
        let delta = next
            .iter()
            .zip(&p)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();
        p = next;
        if delta <= epsilon {
            return Ok(p);
        }
    }
    Err(RankError::NoConvergence {
        algorithm: algorithm.to_string(),
        iterations: MAX_ITERATIONS,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = "Rust is a systems programming language. \
        Rust guarantees memory safety without a garbage collector. \
        The borrow checker enforces memory safety at compile time. \
        Many teams adopt Rust for reliable network services. \
        Cooking pasta requires boiling water. \
        Memory safety bugs cause many security vulnerabilities in systems software.";

    pub(crate) const HUB: &str =
        "Apple banana cherry date. Apple xray. Banana yolk. Cherry zulu. Date quartz.";

    #[test]
    fn parse_splits_sentences_and_words() {
        let doc = ParsedDocument::parse(SAMPLE);
        assert_eq!(doc.len(), 6);
        assert_eq!(doc.sentence(4), "Cooking pasta requires boiling water.");
        assert_eq!(doc.words(4), &["cooking", "pasta", "requires", "boiling", "water"]);
    }

    #[test]
    fn top_indices_breaks_ties_by_position() {
        assert_eq!(top_indices(&[0.5, 0.9, 0.5, 0.1], 3), vec![1, 0, 2]);
        assert_eq!(top_indices(&[0.5, 0.9], 10), vec![1, 0]);
    }

    #[test]
    fn wordless_document_is_empty_vocabulary() {
        let doc = ParsedDocument::parse("123. 456!");
        for ranker in default_rankers() {
            let err = ranker.rank(&doc, 3).unwrap_err();
            assert!(matches!(err, RankError::EmptyVocabulary { .. }), "{}", ranker.algorithm());
        }
    }

    #[test]
    fn empty_document_ranks_to_nothing() {
        let doc = ParsedDocument::parse("");
        for ranker in default_rankers() {
            assert!(ranker.rank(&doc, 3).unwrap().is_empty());
        }
    }

    #[test]
    fn every_ranker_respects_budget_and_indices() {
        let doc = ParsedDocument::parse(SAMPLE);
        for ranker in default_rankers() {
            let picked = ranker.rank(&doc, 3).unwrap();
            assert_eq!(picked.len(), 3, "{}", ranker.algorithm());
            assert!(picked.iter().all(|&i| i < doc.len()));
            let mut unique = picked.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), picked.len());
        }
    }

    #[test]
    fn hub_sentence_ranks_first_everywhere() {
        // Sentence 0 shares one word with each of the others, which share nothing.
        let doc = ParsedDocument::parse(HUB);
        assert_eq!(doc.len(), 5);
        for ranker in default_rankers() {
            let picked = ranker.rank(&doc, 2).unwrap();
            assert_eq!(picked[0], 0, "{}", ranker.algorithm());
        }
    }

    #[test]
    fn power_method_converges_on_stochastic_matrix() {
        let m = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let p = power_method(&m, 1e-9, Algorithm::LexRank).unwrap();
        assert_eq!(p, vec![0.5, 0.5]);
    }

    #[test]
    fn power_method_reports_non_convergence() {
        let m = vec![vec![2.0]];
        let err = power_method(&m, 1e-4, Algorithm::TextRank).unwrap_err();
        assert_eq!(
            err,
            RankError::NoConvergence {
                algorithm: "textrank".into(),
                iterations: MAX_ITERATIONS,
            }
        );
    }
}
