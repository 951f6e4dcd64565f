//! Sentence and word tokenizer.
//!
//! The splitter is punctuation driven: a sentence ends at `.`, `!` or `?`
//! (plus any trailing closing quotes or brackets) followed by whitespace or
//! the end of the text, and at blank lines. A period does not end a
//! sentence after a known abbreviation, a single-letter initial, a dotted
//! acronym ("e.g", "U.S"), or when the next word starts in lowercase.
//!
//! The abbreviation table and word pattern are process-wide assets built
//! once by [`ensure_ready`]. Every entry point calls it, and calling it
//! again is free.

use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// Lowercase abbreviations, without the trailing period.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "fig", "figs", "al", "inc",
    "ltd", "co", "corp", "vol", "vols", "pp", "ed", "eds", "approx", "dept", "est", "jan", "feb",
    "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "mt", "gen", "gov",
    "col", "lt", "sgt", "capt", "rev", "hon", "cf", "ca", "eq", "sec", "ch", "no", "nos",
];

/// Process-wide tokenizer data.
#[derive(Debug)]
pub struct TokenizerAssets {
    abbreviations: HashSet<&'static str>,
    word: Regex,
}

static ASSETS: OnceCell<TokenizerAssets> = OnceCell::new();

/// Initialise the tokenizer assets. Idempotent and thread-safe.
pub fn ensure_ready() -> &'static TokenizerAssets {
    ASSETS.get_or_init(|| {
        debug!("Initialising tokenizer assets");
        TokenizerAssets {
            abbreviations: ABBREVIATIONS.iter().copied().collect(),
            // Letters, with internal apostrophes or hyphens ("don't", "well-known").
            word: Regex::new(r"[^\W\d_]+(?:['-][^\W\d_]+)*")
                .expect("word pattern is valid"),
        }
    })
}

/// Whether [`ensure_ready`] has run in this process.
pub fn is_ready() -> bool {
    ASSETS.get().is_some()
}

/// One sentence: a trimmed slice of the input and its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub offset: usize,
    pub text: &'a str,
}

/// Split `text` into sentences, in document order.
pub fn sentences(text: &str) -> Vec<Sentence<'_>> {
    let assets = ensure_ready();
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];

        if c == '\n' && starts_blank_line(&chars, i) {
            push_sentence(text, start, pos, &mut out);
            start = pos;
            i += 1;
            continue;
        }

        if matches!(c, '.' | '!' | '?') {
            let mut j = i + 1;
            while j < chars.len() && matches!(chars[j].1, '.' | '!' | '?') {
                j += 1;
            }
            while j < chars.len() && is_closing(chars[j].1) {
                j += 1;
            }
            let at_break = j >= chars.len() || chars[j].1.is_whitespace();
            let single_period = c == '.' && j == i + 1;
            let suppressed =
                single_period && assets.suppresses_break(&text[start..pos], next_char(&chars, j));
            if at_break && !suppressed {
                let end = chars.get(j).map(|&(p, _)| p).unwrap_or(text.len());
                push_sentence(text, start, end, &mut out);
                start = end;
            }
            i = j;
            continue;
        }

        i += 1;
    }
    push_sentence(text, start, text.len(), &mut out);
    out
}

/// Sentence texts only.
pub fn sentence_texts(text: &str) -> Vec<&str> {
    sentences(text).into_iter().map(|s| s.text).collect()
}

/// Lowercased words of `text`. Digits and punctuation are not words.
pub fn words(text: &str) -> Vec<String> {
    ensure_ready()
        .word
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

impl TokenizerAssets {
    /// Decide whether a lone period after `before` is not a sentence end.
    fn suppresses_break(&self, before: &str, next: Option<char>) -> bool {
        let token = before
            .split_whitespace()
            .last()
            .unwrap_or("")
            .trim_start_matches(|c: char| !c.is_alphanumeric());
        if token.is_empty() {
            return false;
        }
        if next.is_some_and(|c| c.is_lowercase()) {
            return true;
        }
        let lower = token.to_lowercase();
        if self.abbreviations.contains(lower.as_str()) {
            return true;
        }
        let mut letters = token.chars();
        if let (Some(first), None) = (letters.next(), letters.next()) {
            if first.is_uppercase() {
                return true;
            }
        }
        token.contains('.') && token.chars().all(|c| c.is_alphabetic() || c == '.')
    }
}

fn push_sentence<'a>(text: &'a str, start: usize, end: usize, out: &mut Vec<Sentence<'a>>) {
    let slice = &text[start..end];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = slice.len() - slice.trim_start().len();
    out.push(Sentence {
        offset: start + lead,
        text: trimmed,
    });
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '}' | '\u{201D}' | '\u{2019}' | '\u{00BB}')
}

/// First non-whitespace character at or after `j`.
fn next_char(chars: &[(usize, char)], j: usize) -> Option<char> {
    chars[j.min(chars.len())..]
        .iter()
        .map(|&(_, c)| c)
        .find(|c| !c.is_whitespace())
}

/// A newline followed (after horizontal whitespace) by another newline.
fn starts_blank_line(chars: &[(usize, char)], i: usize) -> bool {
    chars[i + 1..]
        .iter()
        .map(|&(_, c)| c)
        .find(|c| !matches!(c, ' ' | '\t' | '\r'))
        == Some('\n')
}
