//! Local extractive summarizer: ranker ensemble, dedup, document order.
//!
//! ```text
//! text ──▶ ParsedDocument ──▶ LexRank ┐
//!                         ──▶ TextRank ├─▶ pool ──▶ dedup ──▶ reorder ──▶ truncate
//!                         ──▶ LSA ─────┘
//! ```
//!
//! Each ranker is called on its own; one that fails is logged and skipped.

use crate::pipeline::rank::{default_rankers, Algorithm, LexRank, ParsedDocument, SentenceRanker};
use crate::pipeline::tokenize;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Candidates at or above this word-set similarity count as duplicates.
pub const DUPLICATE_THRESHOLD: f64 = 0.85;

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// A sentence proposed by one ranker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub sentence: String,
    pub origin: Algorithm,
}

/// Sentence budget for the ensemble: one per 300 characters, 5 to 15.
pub fn sentence_budget(chars: usize) -> usize {
    (chars / 300).clamp(5, 15)
}

/// Sentence budget for the single-ranker path: one per 350 characters, 3 to 12.
pub fn legacy_budget(chars: usize) -> usize {
    (chars / 350).clamp(3, 12)
}

/// Summarize with the default ensemble. Sentences are newline-joined.
pub fn summarize_local(text: &str) -> String {
    summarize_local_with(text, &default_rankers())
}

/// Summarize with an explicit ranker list, pooled in the given order.
pub fn summarize_local_with(text: &str, rankers: &[Box<dyn SentenceRanker>]) -> String {
    tokenize::ensure_ready();
    let normalized = text.trim();
    if normalized.is_empty() {
        return String::new();
    }
    let budget = sentence_budget(normalized.chars().count());
    let doc = ParsedDocument::parse(normalized);

    let mut pool = Vec::new();
    for ranker in rankers {
        match ranker.rank(&doc, budget) {
            Ok(indices) => pool.extend(indices.into_iter().map(|i| Candidate {
                sentence: collapse_whitespace(doc.sentence(i)),
                origin: ranker.algorithm(),
            })),
            Err(e) => warn!("{} ranker skipped: {}", ranker.algorithm(), e),
        }
    }

    let unique = dedup(pool);
    let mut ordered = reorder(&collapse_whitespace(normalized), unique);
    ordered.truncate(budget);
    debug!(
        "Local summary: {} of {} sentences (budget {})",
        ordered.len(),
        doc.len(),
        budget
    );
    ordered
        .iter()
        .map(|c| c.sentence.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-ranker summary (LexRank only), kept for callers of the older flow.
///
/// Sentences come back in document order.
pub fn summarize_local_simple(text: &str) -> String {
    tokenize::ensure_ready();
    let normalized = text.trim();
    if normalized.is_empty() {
        return String::new();
    }
    let budget = legacy_budget(normalized.chars().count());
    let doc = ParsedDocument::parse(normalized);
    let mut indices = match LexRank.rank(&doc, budget) {
        Ok(indices) => indices,
        Err(e) => {
            warn!("lexrank failed: {}", e);
            return String::new();
        }
    };
    indices.sort_unstable();
    indices
        .into_iter()
        .map(|i| collapse_whitespace(doc.sentence(i)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runs of whitespace, line breaks included, become one space so each
/// summary sentence stays on one output line.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Word-set Jaccard similarity, case-insensitive. 0 when either side has no words.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let wa = word_set(a);
    let wb = word_set(b);
    if wa.is_empty() || wb.is_empty() {
        return 0.0;
    }
    let shared = wa.intersection(&wb).count();
    let union = wa.union(&wb).count();
    shared as f64 / union as f64
}

fn word_set(s: &str) -> HashSet<String> {
    let lower = s.to_lowercase();
    RE_WORD
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Keep each candidate only if it is below [`DUPLICATE_THRESHOLD`] against
/// every candidate already kept. Left to right; the first of a group wins.
pub fn dedup(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for c in candidates {
        if kept
            .iter()
            .all(|k| jaccard(&c.sentence, &k.sentence) < DUPLICATE_THRESHOLD)
        {
            kept.push(c);
        }
    }
    kept
}

/// Stable sort by first occurrence in `source`; sentences not found go last.
pub fn reorder(source: &str, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by_key(|c| source.find(c.sentence.as_str()).unwrap_or(usize::MAX));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RankError;

    const REPORT: &str = "The city council met on Monday to review the annual budget. \
        Council members debated funding for public transit at length. \
        The transit authority requested additional funds for new buses. \
        Several residents spoke in favor of expanding bus service to the suburbs. \
        The budget also includes money for park maintenance and library hours. \
        Library advocates praised the extended weekend hours. \
        A vote on the final budget is expected next month. \
        The mayor said the budget balances growth with fiscal responsibility. \
        Critics argued that property taxes would rise under the proposal. \
        The council will hold another public hearing before the vote.";

    struct Failing;

    impl SentenceRanker for Failing {
        fn algorithm(&self) -> Algorithm {
            Algorithm::Lsa
        }

        fn rank(&self, _doc: &ParsedDocument<'_>, _budget: usize) -> Result<Vec<usize>, RankError> {
            Err(RankError::NoConvergence {
                algorithm: "lsa".into(),
                iterations: 1,
            })
        }
    }

    /// Proposes fixed indices regardless of content.
    struct Fixed(Vec<usize>);

    impl SentenceRanker for Fixed {
        fn algorithm(&self) -> Algorithm {
            Algorithm::TextRank
        }

        fn rank(&self, _doc: &ParsedDocument<'_>, _budget: usize) -> Result<Vec<usize>, RankError> {
            Ok(self.0.clone())
        }
    }

    fn candidate(s: &str) -> Candidate {
        Candidate {
            sentence: s.to_string(),
            origin: Algorithm::LexRank,
        }
    }

    #[test]
    fn budgets_clamp() {
        assert_eq!(sentence_budget(0), 5);
        assert_eq!(sentence_budget(3_000), 10);
        assert_eq!(sentence_budget(100_000), 15);
        assert_eq!(legacy_budget(0), 3);
        assert_eq!(legacy_budget(2_100), 6);
        assert_eq!(legacy_budget(100_000), 12);
    }

    #[test]
    fn empty_input_gives_empty_summary() {
        assert_eq!(summarize_local(""), "");
        assert_eq!(summarize_local("   \n"), "");
        assert_eq!(summarize_local_simple(""), "");
    }

    #[test]
    fn jaccard_basics() {
        assert_eq!(jaccard("", "anything"), 0.0);
        assert_eq!(jaccard("The cat", "the CAT"), 1.0);
        assert!((jaccard("a b c", "a b d") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn dedup_keeps_first_of_near_duplicates() {
        let pool = vec![
            candidate("The budget was approved on Monday."),
            candidate("the budget was approved on monday"),
            candidate("Buses are late."),
        ];
        let kept = dedup(pool);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].sentence, "The budget was approved on Monday.");
    }

    #[test]
    fn reorder_is_stable_and_puts_unknowns_last() {
        let source = "Alpha first. Beta second. Gamma third.";
        let ordered = reorder(
            source,
            vec![
                candidate("Not in source."),
                candidate("Gamma third."),
                candidate("Alpha first."),
                candidate("Also missing."),
            ],
        );
        let texts: Vec<_> = ordered.iter().map(|c| c.sentence.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Alpha first.", "Gamma third.", "Not in source.", "Also missing."]
        );
    }

    #[test]
    fn respects_budget_and_document_order() {
        let summary = summarize_local(REPORT);
        let lines: Vec<&str> = summary.lines().collect();
        assert!(!lines.is_empty());
        assert!(lines.len() <= sentence_budget(REPORT.chars().count()));
        let offsets: Vec<usize> = lines.iter().map(|l| REPORT.find(l).unwrap()).collect();
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]), "{offsets:?}");
    }

    #[test]
    fn no_near_duplicates_in_summary() {
        let text = format!("{REPORT} {REPORT}");
        let summary = summarize_local(&text);
        let lines: Vec<&str> = summary.lines().collect();
        for (i, a) in lines.iter().enumerate() {
            for b in &lines[i + 1..] {
                assert!(jaccard(a, b) < DUPLICATE_THRESHOLD, "{a:?} ~ {b:?}");
            }
        }
    }

    #[test]
    fn failing_ranker_is_skipped() {
        let rankers: Vec<Box<dyn SentenceRanker>> = vec![Box::new(Failing), Box::new(Fixed(vec![2, 0]))];
        let summary = summarize_local_with(REPORT, &rankers);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("The city council met"));
        assert!(lines[1].starts_with("The transit authority"));
    }

    #[test]
    fn all_rankers_failing_gives_empty_summary() {
        let rankers: Vec<Box<dyn SentenceRanker>> = vec![Box::new(Failing)];
        assert_eq!(summarize_local_with(REPORT, &rankers), "");
    }

    #[test]
    fn short_text_returns_every_sentence() {
        let summary = summarize_local("One short line. Another short line.");
        assert_eq!(summary, "One short line.\nAnother short line.");
    }

    #[test]
    fn wrapped_sentences_stay_on_one_line() {
        let text: String = (0..8)
            .map(|i| format!("Topic {i} alpha\nbeta gamma item{i}. "))
            .collect();
        let budget = sentence_budget(text.trim().chars().count());
        let summary = summarize_local(&text);
        let lines: Vec<&str> = summary.lines().collect();
        assert!(lines.len() <= budget, "{} lines for budget {budget}", lines.len());
        assert!(lines.iter().all(|l| l.contains("alpha beta gamma")), "{lines:?}");
        let flat = collapse_whitespace(&text);
        let offsets: Vec<usize> = lines.iter().map(|l| flat.find(l).unwrap()).collect();
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]), "{offsets:?}");

        for line in summarize_local_simple(&text).lines() {
            assert!(line.contains("alpha beta gamma"), "{line:?}");
        }
    }

    #[test]
    fn simple_path_uses_legacy_budget_in_document_order() {
        let summary = summarize_local_simple(REPORT);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), legacy_budget(REPORT.chars().count()));
        let offsets: Vec<usize> = lines.iter().map(|l| REPORT.find(l).unwrap()).collect();
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
    }
}
