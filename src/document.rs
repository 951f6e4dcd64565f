//! The per-request input document.
//!
//! A [`Document`] is created once per request by [`crate::pipeline::input`]
//! and dropped when the summary has been produced. Nothing is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the text of a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Text pasted into a form or piped on stdin.
    Pasted,
    /// Text extracted from an uploaded PDF.
    Pdf,
    /// An uploaded `.txt` file.
    PlainFile,
}

impl SourceKind {
    /// Only PDF-sourced text goes through the artefact pass by default.
    pub fn needs_artifact_pass(&self) -> bool {
        matches!(self, SourceKind::Pdf)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Pasted => f.write_str("pasted"),
            SourceKind::Pdf => f.write_str("pdf"),
            SourceKind::PlainFile => f.write_str("plain-file"),
        }
    }
}

/// How the raw bytes were turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    /// Valid UTF-8 (or text that never was bytes, e.g. pasted input).
    Utf8,
    /// UTF-8 with invalid sequences dropped.
    Utf8Lossy,
    /// Text produced by the PDF engine.
    PdfText,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => f.write_str("utf-8"),
            TextEncoding::Utf8Lossy => f.write_str("utf-8 (lossy)"),
            TextEncoding::PdfText => f.write_str("pdf-text"),
        }
    }
}

/// Raw input text plus what we know about its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub source: SourceKind,
    /// Size of the original input in bytes (upload size for files).
    pub byte_len: usize,
    pub encoding: TextEncoding,
}

impl Document {
    /// A document made from pasted text.
    pub fn pasted(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            byte_len: text.len(),
            text,
            source: SourceKind::Pasted,
            encoding: TextEncoding::Utf8,
        }
    }
}
