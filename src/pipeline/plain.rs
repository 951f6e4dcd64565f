//! Markup → plain text, the inverse of [`crate::pipeline::style`].
//!
//! Used before rendering a summary to PDF. List items become `• item`
//! lines, `<br/>` becomes a newline, `</p>` a blank line, and every other
//! tag is dropped without touching the text around it.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bullet prefix for list items.
pub const BULLET: &str = "\u{2022} ";

static RE_LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<li\s*>\s*(.*?)\s*</li\s*>").unwrap());

static RE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<br\s*/?>").unwrap());

static RE_PARA_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</p\s*>").unwrap());

static RE_PARA_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<p\s*>").unwrap());

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?b\s*>").unwrap());

static RE_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?(ul|ol)\s*>").unwrap());

static RE_ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<[^>]+>").unwrap());

static RE_EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Convert formatter markup to plain text.
pub fn to_plain(markup: &str) -> String {
    if markup.is_empty() {
        return String::new();
    }
    let text = decode_entities(markup);
    let text = RE_LIST_ITEM.replace_all(&text, format!("{}${{1}}\n", BULLET).as_str());
    let text = RE_BREAK.replace_all(&text, "\n");
    let text = RE_PARA_CLOSE.replace_all(&text, "\n\n");
    let text = RE_PARA_OPEN.replace_all(&text, "");
    let text = RE_BOLD.replace_all(&text, "");
    let text = RE_LIST.replace_all(&text, "");
    let text = RE_ANY_TAG.replace_all(&text, "");
    let text = RE_EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Decode HTML character references (the full HTML5 named set plus
/// numeric forms). Unknown names are left as written.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
