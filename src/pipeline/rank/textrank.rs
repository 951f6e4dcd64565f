//! TextRank: PageRank over a word-overlap sentence graph.

use super::{check_vocabulary, power_method, top_indices, Algorithm, ParsedDocument, SentenceRanker};
use crate::error::RankError;

const DAMPING: f64 = 0.85;
const EPSILON: f64 = 1e-4;

/// Keeps row normalisation finite for sentences with no edges.
const DELTA: f64 = 1e-7;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextRank;

impl SentenceRanker for TextRank {
    fn algorithm(&self) -> Algorithm {
        Algorithm::TextRank
    }

    fn rank(&self, doc: &ParsedDocument<'_>, budget: usize) -> Result<Vec<usize>, RankError> {
        if !check_vocabulary(doc, Algorithm::TextRank)? {
            return Ok(Vec::new());
        }
        let matrix = transition_matrix(doc.all_words());
        let scores = power_method(&matrix, EPSILON, Algorithm::TextRank)?;
        Ok(top_indices(&scores, budget))
    }
}

/// Damped, row-normalised edge weights.
fn transition_matrix(sentences: &[Vec<String>]) -> Vec<Vec<f64>> {
    let n = sentences.len();
    let mut weights = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let w = edge_weight(&sentences[i], &sentences[j]);
            weights[i][j] = w;
            weights[j][i] = w;
        }
    }

    let teleport = (1.0 - DAMPING) / n as f64;
    weights
        .into_iter()
        .map(|row| {
            let total: f64 = row.iter().sum::<f64>() + DELTA;
            row.into_iter()
                .map(|w| teleport + DAMPING * w / total)
                .collect()
        })
        .collect()
}

/// Occurrences in `b` of the words of `a`, over `ln|a| + ln|b|`.
fn edge_weight(a: &[String], b: &[String]) -> f64 {
    let overlap: usize = a
        .iter()
        .map(|w| b.iter().filter(|x| *x == w).count())
        .sum();
    if overlap == 0 {
        return 0.0;
    }
    let norm = (a.len() as f64).ln() + (b.len() as f64).ln();
    if norm.abs() < 1e-12 {
        overlap as f64
    } else {
        overlap as f64 / norm
    }
}
