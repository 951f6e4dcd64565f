//! Result types returned by [`crate::summarize::summarize`].

use crate::config::{Style, SummarizerMode};
use crate::document::{SourceKind, TextEncoding};
use serde::{Deserialize, Serialize};

/// A formatted summary plus everything a host needs to present it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    /// Styled markup with the trailing word-count line.
    pub markup: String,
    /// The plain summary the markup was built from.
    pub summary: String,
    pub style: Style,
    /// The summarizer that actually produced `summary`.
    pub mode: SummarizerMode,
    /// True when remote mode was requested but the local summarizer ran.
    pub fell_back: bool,
    /// The provider error that caused the fallback.
    pub fallback_reason: Option<String>,
    pub stats: SummaryStats,
}

/// Counters describing one summarization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub source: Option<SourceKind>,
    pub encoding: Option<TextEncoding>,
    /// Raw input size in bytes.
    pub input_bytes: usize,
    /// Repaired text length in characters.
    pub repaired_chars: usize,
    /// Non-empty lines in the plain summary.
    pub summary_lines: usize,
    /// Word count reported on the markup's last line.
    pub word_count: usize,
    /// Completion calls made (0 for local runs).
    pub remote_calls: usize,
    pub total_duration_ms: u64,
}
