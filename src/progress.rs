//! Progress-callback trait for remote summarization events.
//!
//! Inject an [`Arc<dyn SummaryProgressCallback>`] via
//! [`crate::config::SummarizeConfigBuilder::progress_callback`] to receive
//! events while the remote adapter walks through chunks. The local path is
//! fast enough that it only reports start, fallback and completion.
//!
//! # Example
//!
//! ```rust
//! use edgequake_summarize::{SummaryProgressCallback, SummarizeConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     chunks: AtomicUsize,
//! }
//!
//! impl SummaryProgressCallback for CountingCallback {
//!     fn on_chunk_complete(&self, index: usize, total: usize, summary_len: usize) {
//!         self.chunks.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("chunk {}/{} done ({} chars)", index, total, summary_len);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { chunks: AtomicUsize::new(0) });
//!
//! let config = SummarizeConfig::builder()
//!     .progress_callback(counter as Arc<dyn SummaryProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::config::SummarizerMode;
use std::sync::Arc;

/// Called by the summarization pipeline as it works through a request.
///
/// Implementations must be `Send + Sync`. All methods have default no-op
/// implementations so callers only override what they care about.
pub trait SummaryProgressCallback: Send + Sync {
    /// Called once after input repair, before any summarizer runs.
    ///
    /// # Arguments
    /// * `mode`        — the summarizer about to run
    /// * `input_chars` — length of the repaired text in characters
    fn on_summary_start(&self, mode: SummarizerMode, input_chars: usize) {
        let _ = (mode, input_chars);
    }

    /// Called before the completion request for a chunk is sent.
    ///
    /// # Arguments
    /// * `index` — 1-indexed chunk number
    /// * `total` — number of chunks (1 for short texts)
    fn on_chunk_start(&self, index: usize, total: usize) {
        let _ = (index, total);
    }

    /// Called when a chunk's partial summary arrives.
    fn on_chunk_complete(&self, index: usize, total: usize, summary_len: usize) {
        let _ = (index, total, summary_len);
    }

    /// Called before the request that merges `partials` partial summaries.
    fn on_merge_start(&self, partials: usize) {
        let _ = partials;
    }

    /// Called when the remote path failed and the local summarizer takes over.
    fn on_fallback(&self, reason: &str) {
        let _ = reason;
    }

    /// Called once with the number of sentences in the final plain summary.
    fn on_summary_complete(&self, sentences: usize) {
        let _ = sentences;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SummaryProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummarizeConfig`].
pub type ProgressCallback = Arc<dyn SummaryProgressCallback>;
