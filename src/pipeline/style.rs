//! Style formatter: plain summary → presentation markup.
//!
//! The markup is the small HTML subset that [`crate::pipeline::plain::to_plain`]
//! understands (`<ul>`, `<li>`, `<b>`, `<br/>`). Every style ends with a
//! `Word count:` line whose number counts the word tokens of the markup
//! body itself, tag names included.

use crate::config::Style;
use crate::pipeline::tokenize;
use once_cell::sync::Lazy;
use regex::Regex;

/// Review-question templates, picked by `index % 7`.
pub const QUESTION_TEMPLATES: [&str; 7] = [
    "Why is {} important?",
    "What problem does {} address?",
    "How does {} work in this context?",
    "What are the key assumptions behind {}?",
    "What are the potential risks or limitations of {}?",
    "Where is {} applied effectively?",
    "How could {} be improved?",
];

/// Longest sentence prefix substituted into a question.
const QUESTION_SNIPPET_CHARS: usize = 90;

static RE_MARKUP_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());

/// Render `summary` in `style`. Empty (or whitespace-only) input gives `""`.
pub fn format_summary(summary: &str, style: Style) -> String {
    let clean = summary.trim();
    if clean.is_empty() {
        return String::new();
    }
    let sentences = split_sentences(clean);

    let body = match style {
        Style::Bullets => bullet_list(&sentences),
        Style::Abstract => sentences.join(" ").replace('\n', "<br/>"),
        Style::Study => study_notes(clean, &sentences),
    };
    let count = word_count(&body);
    format!("{}<br/><br/><b>Word count:</b> {}", body, count)
}

/// Word tokens in `markup`, tags included.
pub fn word_count(markup: &str) -> usize {
    RE_MARKUP_WORD.find_iter(markup).count()
}

/// The number on the trailing `Word count:` line of formatter output.
pub fn reported_word_count(markup: &str) -> Option<usize> {
    let (_, tail) = markup.rsplit_once("<b>Word count:</b>")?;
    tail.trim().parse().ok()
}

/// Question `index` for `sentence`.
pub fn question(index: usize, sentence: &str) -> String {
    let flattened = sentence.trim().replace('\n', " ");
    let snippet: String = flattened.trim().chars().take(QUESTION_SNIPPET_CHARS).collect();
    let snippet = snippet.trim_end_matches([' ', '.', ',', ':', ';', '!', '?']);
    QUESTION_TEMPLATES[index % QUESTION_TEMPLATES.len()].replace("{}", snippet)
}

fn split_sentences(clean: &str) -> Vec<&str> {
    let sentences = tokenize::sentence_texts(clean);
    if !sentences.is_empty() {
        return sentences;
    }
    clean
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn bullet_list(sentences: &[&str]) -> String {
    let items: String = sentences.iter().map(|s| format!("<li>{}</li>", s)).collect();
    format!("<ul>{}</ul>", items)
}

fn study_notes(clean: &str, sentences: &[&str]) -> String {
    let key_points = sentences.len().clamp(3, 8);
    let key_items: String = sentences
        .iter()
        .take(key_points)
        .map(|s| format!("<li>{}</li>", s))
        .collect();

    let max_questions = sentences.len().clamp(3, 5);
    let question_items: String = sentences
        .iter()
        .take(max_questions)
        .enumerate()
        .map(|(i, s)| format!("<li>{}</li>", question(i, s)))
        .collect();

    let overview = sentences.first().copied().unwrap_or(clean);
    format!(
        "<b>Study Notes</b><br/><br/>\
         <b>Overview</b><br/>{}<br/><br/>\
         <b>Key Points</b><ul>{}</ul>\
         <b>Potential Questions</b><ul>{}</ul>",
        overview, key_items, question_items
    )
}
