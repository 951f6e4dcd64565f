//! LexRank: eigenvector centrality over a thresholded cosine-similarity graph.

use super::{check_vocabulary, power_method, top_indices, Algorithm, ParsedDocument, SentenceRanker};
use crate::error::RankError;
use std::collections::{HashMap, HashSet};

/// Similarity above which two sentences are linked.
const THRESHOLD: f64 = 0.1;

/// Stop iterating once the score vector moves less than this (L2).
const EPSILON: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default)]
pub struct LexRank;

impl SentenceRanker for LexRank {
    fn algorithm(&self) -> Algorithm {
        Algorithm::LexRank
    }

    fn rank(&self, doc: &ParsedDocument<'_>, budget: usize) -> Result<Vec<usize>, RankError> {
        if !check_vocabulary(doc, Algorithm::LexRank)? {
            return Ok(Vec::new());
        }
        let scores = scores(doc.all_words())?;
        Ok(top_indices(&scores, budget))
    }
}

/// LexRank score of every sentence.
pub(crate) fn scores(sentences: &[Vec<String>]) -> Result<Vec<f64>, RankError> {
    let tf: Vec<HashMap<&str, f64>> = sentences.iter().map(|s| term_frequency(s)).collect();
    let idf = inverse_document_frequency(sentences);
    let n = sentences.len();

    let mut matrix = vec![vec![0.0; n]; n];
    for row in 0..n {
        let mut degree = 0.0;
        for col in 0..n {
            if cosine(&tf[row], &tf[col], &idf) > THRESHOLD {
                matrix[row][col] = 1.0;
                degree += 1.0;
            }
        }
        if degree > 0.0 {
            for cell in matrix[row].iter_mut() {
                *cell /= degree;
            }
        }
    }
    power_method(&matrix, EPSILON, Algorithm::LexRank)
}

/// Count of each word divided by the count of the sentence's most frequent word.
fn term_frequency(words: &[String]) -> HashMap<&str, f64> {
    let mut counts: HashMap<&str, f64> = HashMap::new();
    for w in words {
        *counts.entry(w.as_str()).or_insert(0.0) += 1.0;
    }
    let max = counts.values().copied().fold(0.0, f64::max);
    if max > 0.0 {
        for v in counts.values_mut() {
            *v /= max;
        }
    }
    counts
}

/// `ln(N / (1 + df))` per word, `N` being the number of sentences.
fn inverse_document_frequency(sentences: &[Vec<String>]) -> HashMap<&str, f64> {
    let n = sentences.len() as f64;
    let mut df: HashMap<&str, f64> = HashMap::new();
    for s in sentences {
        let unique: HashSet<&str> = s.iter().map(String::as_str).collect();
        for w in unique {
            *df.entry(w).or_insert(0.0) += 1.0;
        }
    }
    df.into_iter()
        .map(|(w, d)| (w, (n / (1.0 + d)).ln()))
        .collect()
}

/// Idf-modified cosine similarity.
fn cosine(tf1: &HashMap<&str, f64>, tf2: &HashMap<&str, f64>, idf: &HashMap<&str, f64>) -> f64 {
    let idf_of = |w: &str| idf.get(w).copied().unwrap_or(0.0);

    let numerator: f64 = tf1
        .iter()
        .filter_map(|(w, a)| tf2.get(w).map(|b| a * b * idf_of(*w).powi(2)))
        .sum();
    let norm = |tf: &HashMap<&str, f64>| -> f64 {
        tf.iter().map(|(w, v)| (v * idf_of(*w)).powi(2)).sum::<f64>()
    };
    let (d1, d2) = (norm(tf1), norm(tf2));
    if d1 > 0.0 && d2 > 0.0 {
        numerator / (d1.sqrt() * d2.sqrt())
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::rank::tests::HUB;

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn term_frequency_is_relative_to_max() {
        let w = words("a b a c a");
        let tf = term_frequency(&w);
        assert_eq!(tf["a"], 1.0);
        assert!((tf["b"] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn idf_uses_one_plus_document_frequency() {
        let sentences = vec![words("x y"), words("x"), words("z")];
        let idf = inverse_document_frequency(&sentences);
        assert!((idf["x"] - (3.0f64 / 3.0).ln()).abs() < 1e-12);
        assert!((idf["y"] - (3.0f64 / 2.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn cosine_of_disjoint_sentences_is_zero() {
        let sentences = vec![words("a b"), words("c d"), words("e f")];
        let tf: Vec<_> = sentences.iter().map(|s| term_frequency(s)).collect();
        let idf = inverse_document_frequency(&sentences);
        assert_eq!(cosine(&tf[0], &tf[1], &idf), 0.0);
        assert!((cosine(&tf[0], &tf[0], &idf) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hub_scores_highest() {
        let doc = ParsedDocument::parse(HUB);
        let s = scores(doc.all_words()).unwrap();
        assert!(s[1..].iter().all(|&leaf| s[0] > leaf), "{s:?}");
    }
}
