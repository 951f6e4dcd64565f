//! Repair: recover readable prose from extracted or pasted text.
//!
//! Text pulled out of PDFs arrives with page furniture, words hyphenated
//! across line wraps, hard line breaks in the middle of paragraphs, and
//! tokens glued together where the extractor lost a space. Pasted text has
//! milder versions of the same problems.
//!
//! Two passes, each a pure `&str → String` function:
//!
//! 1. [`clean_pdf_artifacts`] — page headers/footers, de-hyphenation,
//!    paragraph reconstruction. Meaningful for PDF text, harmless elsewhere.
//! 2. [`repair_whitespace`] — token-level spacing repair, with an optional
//!    [`WordSegmenter`] for long glued lowercase runs.
//!
//! [`repair`] runs both. Neither pass can fail: the worst case is a
//! best-effort result.

use crate::pipeline::segment::WordSegmenter;
use once_cell::sync::Lazy;
use regex::Regex;

/// Lowercase runs at least this long are offered to the segmenter.
const SEGMENT_RUN_LEN: usize = 12;

/// Lowercase tokens longer than this are always offered to the segmenter.
const SEGMENT_TOKEN_LEN: usize = 18;

/// Run the artefact pass followed by the token-repair pass.
///
/// Empty or whitespace-only input yields an empty string.
pub fn repair(raw: &str, segmenter: &dyn WordSegmenter) -> String {
    repair_whitespace(&clean_pdf_artifacts(raw), segmenter)
}

// ── Pass 1: PDF artefacts ────────────────────────────────────────────────────

static RE_PAGE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*(P\s*a\s*g\s*e\b.*)$").unwrap());

static RE_PAGE_OF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*Page\s*\d+\s*(of|/)\s*\d+\s*$").unwrap());

static RE_SIGNATURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*Signature\w*.*$").unwrap());

static RE_HYPHEN_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z])-\s*\n\s*([A-Za-z])").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static RE_SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s+([A-Z])").unwrap());

/// Strip PDF page furniture and rebuild paragraphs.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF / CR → LF)
/// 2. Drop page header/footer lines ("Page 3", "P a g e 3", "Page 3 of 9")
/// 3. Drop signature boilerplate lines
/// 4. Rejoin words hyphenated across a line wrap
/// 5. Turn single newlines inside paragraphs into spaces
/// 6. Collapse whitespace runs to one space
/// 7. Start a new paragraph after a period followed by an uppercase letter
pub fn clean_pdf_artifacts(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let t = normalise_line_endings(text);
    let t = RE_PAGE_HEADER.replace_all(&t, "");
    let t = RE_PAGE_OF.replace_all(&t, "");
    let t = RE_SIGNATURE.replace_all(&t, "");
    let t = RE_HYPHEN_BREAK.replace_all(&t, "${1}${2}");
    let t = join_wrapped_lines(&t);
    let t = RE_WHITESPACE.replace_all(&t, " ");
    let t = RE_SENTENCE_BREAK.replace_all(&t, ".\n\n${1}");
    t.trim().to_string()
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

/// Replace every newline that is neither preceded nor followed by another
/// newline with a space. Blank-line separators survive.
fn join_wrapped_lines(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let lone = c == '\n'
                && (i == 0 || chars[i - 1] != '\n')
                && chars.get(i + 1) != Some(&'\n');
            if lone {
                ' '
            } else {
                c
            }
        })
        .collect()
}

// ── Pass 2: token repair ─────────────────────────────────────────────────────

static RE_CAMEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

static RE_NONDIGIT_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\D)(\d)").unwrap());

static RE_DIGIT_NONDIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)(\D)").unwrap());

static RE_TOKENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+|[^A-Za-z]+").unwrap());

static RE_SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([.,;:!?])").unwrap());

/// Repair missing and surplus spaces.
///
/// Splits `camelCase` glue, separates digits from non-digits, adds a space
/// after `/`, offers long lowercase runs to `segmenter`, then normalises
/// spacing around punctuation and drops empty lines.
pub fn repair_whitespace(raw: &str, segmenter: &dyn WordSegmenter) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let text = RE_CAMEL.replace_all(raw, "${1} ${2}");
    let text = RE_NONDIGIT_DIGIT.replace_all(&text, "${1} ${2}");
    let text = RE_DIGIT_NONDIGIT.replace_all(&text, "${1} ${2}");
    let text = text.replace('/', "/ ");

    let mut tokens: Vec<String> = Vec::new();
    for m in RE_TOKENS.find_iter(&text) {
        let token = m.as_str();
        if needs_segmentation(token) {
            tokens.extend(segmenter.split(token));
        } else {
            tokens.push(token.to_string());
        }
    }

    let text = tokens.join(" ");
    let text = RE_WHITESPACE.replace_all(&text, " ");
    let text = RE_SPACE_BEFORE_PUNCT.replace_all(&text, "${1}");
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// An all-lowercase alphabetic token that is suspiciously long.
fn needs_segmentation(token: &str) -> bool {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_lowercase()) {
        return false;
    }
    token.len() > SEGMENT_TOKEN_LEN || longest_lowercase_run(token) >= SEGMENT_RUN_LEN
}

fn longest_lowercase_run(token: &str) -> usize {
    let mut best = 0;
    let mut current = 0;
    for c in token.chars() {
        if c.is_ascii_lowercase() {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::segment::{DictionarySegmenter, NoSegmenter};

    fn squash(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(repair("", &NoSegmenter), "");
        assert_eq!(repair("   \n\t  ", &NoSegmenter), "");
    }

    #[test]
    fn test_dehyphenation_and_camel_split() {
        let out = repair("word-\nbreak happens. SeparateWord", &NoSegmenter);
        assert!(out.contains("wordbreak happens."), "got: {out:?}");
        assert!(out.contains(" Separate Word"), "got: {out:?}");
    }

    #[test]
    fn test_page_lines_removed() {
        let raw = "Intro text here.\nPage 3 of 10\nmore text\nP a g e 4\nend";
        let out = clean_pdf_artifacts(raw);
        assert!(!out.contains("Page"), "got: {out:?}");
        assert!(!out.contains("P a g e"), "got: {out:?}");
        assert!(out.contains("more text"));
    }

    #[test]
    fn test_page_lines_case_insensitive() {
        let out = clean_pdf_artifacts("body text\nPAGE 2 / 7\nsignature: ________\ntail");
        assert_eq!(out, "body text tail");
    }

    #[test]
    fn test_single_newlines_joined() {
        let out = clean_pdf_artifacts("a line\nthat wraps\n\nnext para");
        // Whitespace collapse runs after the join, so paragraphs flatten too.
        assert_eq!(out, "a line that wraps next para");
    }

    #[test]
    fn test_paragraph_break_after_period() {
        let out = clean_pdf_artifacts("First sentence.  Second one.");
        assert_eq!(out, "First sentence.\n\nSecond one.");
    }

    #[test]
    fn test_crlf_normalised() {
        let out = clean_pdf_artifacts("alpha\r\nbeta\rgamma");
        assert_eq!(out, "alpha beta gamma");
    }

    #[test]
    fn test_digit_boundaries() {
        let out = repair_whitespace("Chapter3covers2024data", &NoSegmenter);
        assert_eq!(out, "Chapter 3 covers 2024 data");
    }

    #[test]
    fn test_slash_gets_space() {
        // "/" is its own non-alphabetic token, so it ends up spaced on both sides.
        let out = repair_whitespace("and/or", &NoSegmenter);
        assert_eq!(out, "and / or");
    }

    #[test]
    fn test_space_before_punctuation_removed() {
        let out = repair_whitespace("Hello , world ; done !", &NoSegmenter);
        assert_eq!(out, "Hello, world; done!");
    }

    #[test]
    fn test_long_token_left_alone_without_segmenter() {
        let token = "abcdefghijklmnopqrst";
        assert_eq!(token.len(), 20);
        let out = repair(&format!("see {token} now"), &NoSegmenter);
        assert!(out.contains(token), "got: {out:?}");
    }

    #[test]
    fn test_long_token_split_with_segmenter() {
        let seg = DictionarySegmenter::from_words(["the", "quick", "brown", "fox", "jumps"]);
        let out = repair("thequickbrownfoxjumps today", &seg);
        assert_eq!(out, "the quick brown fox jumps today");
    }

    #[test]
    fn test_short_token_not_offered_to_segmenter() {
        let seg = DictionarySegmenter::from_words(["in", "side"]);
        let out = repair_whitespace("inside", &seg);
        assert_eq!(out, "inside");
    }

    #[test]
    fn test_needs_segmentation() {
        assert!(needs_segmentation("abcdefghijkl"));
        assert!(!needs_segmentation("abcdefghijk"));
        assert!(!needs_segmentation("Abcdefghijklmnop"));
        assert!(!needs_segmentation(""));
    }

    #[test]
    fn test_idempotent_up_to_whitespace() {
        let samples = [
            "word-\nbreak happens. SeparateWord and 42items/unit.\nPage 2 of 3\nEnd of text.",
            "Plain prose with nothing odd about it. Second sentence follows.",
            "A tableOf contents , with 3chapters ; and more !",
        ];
        for s in samples {
            let once = repair(s, &NoSegmenter);
            let twice = repair(&once, &NoSegmenter);
            assert_eq!(squash(&once), squash(&twice), "input: {s:?}");
        }
    }
}
