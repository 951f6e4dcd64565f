//! Latent semantic analysis ranker.
//!
//! Builds a smoothed term/sentence matrix `A` and scores sentence `j` as
//! `√Σᵢ σᵢ²·vᵢⱼ²` over the leading singular dimensions. Every dimension is
//! kept, and with a full orthonormal `V` that sum collapses to `(AᵀA)ⱼⱼ`, the
//! squared norm of column `j`. The score is computed from that identity
//! straight off the sparse term counts, so the cost is linear in the number
//! of words rather than cubic in the number of sentences.

use super::{check_vocabulary, top_indices, Algorithm, ParsedDocument, SentenceRanker};
use crate::error::RankError;
use std::collections::{HashMap, HashSet};

/// Weight every cell gets before term frequency is added.
const SMOOTH: f64 = 0.4;

#[derive(Debug, Clone, Copy, Default)]
pub struct Lsa;

impl SentenceRanker for Lsa {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Lsa
    }

    fn rank(&self, doc: &ParsedDocument<'_>, budget: usize) -> Result<Vec<usize>, RankError> {
        if !check_vocabulary(doc, Algorithm::Lsa)? {
            return Ok(Vec::new());
        }
        let scores = scores(doc.all_words());
        Ok(top_indices(&scores, budget))
    }
}

/// Per-sentence LSA score: the norm of the sentence's smoothed column.
///
/// A column whose sentence has words holds `SMOOTH + (1 - SMOOTH)·tf/max` in
/// its own rows and `SMOOTH` in every other dictionary row. A wordless
/// sentence has an all-zero column.
pub(crate) fn scores(sentences: &[Vec<String>]) -> Vec<f64> {
    let dictionary: HashSet<&str> = sentences.iter().flatten().map(String::as_str).collect();
    let vocabulary = dictionary.len() as f64;

    sentences
        .iter()
        .map(|words| {
            let mut counts: HashMap<&str, f64> = HashMap::new();
            for w in words {
                *counts.entry(w.as_str()).or_insert(0.0) += 1.0;
            }
            let max = counts.values().copied().fold(0.0, f64::max);
            if max == 0.0 {
                return 0.0;
            }
            let own: f64 = counts
                .values()
                .map(|tf| (SMOOTH + (1.0 - SMOOTH) * tf / max).powi(2))
                .sum();
            let rest = (vocabulary - counts.len() as f64) * SMOOTH * SMOOTH;
            (own + rest).sqrt()
        })
        .collect()
}
