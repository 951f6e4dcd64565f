//! # edgequake-summarize
//!
//! Summarise pasted text, PDFs and plain-text files.
//!
//! ## Why this crate?
//!
//! Text pulled out of PDFs is noisy: page furniture, words hyphenated across
//! line wraps, tokens glued together. This crate repairs the text first and
//! then summarises it either offline, with an ensemble of three extractive
//! rankers, or through a remote LLM, falling back to the offline ensemble
//! whenever the provider fails. The summary is styled as bullets, an
//! abstract or study notes, and can be exported as a one-page PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input
//!  │
//!  ├─ 1. Input    pasted text, upload, local path or URL
//!  ├─ 2. Extract  PDF text via pdfium (spawn_blocking)
//!  ├─ 3. Repair   artefact pass (PDF only) + whitespace repair
//!  ├─ 4. Summary  LexRank + TextRank + LSA ensemble, or remote LLM with fallback
//!  ├─ 5. Style    bullets / abstract / study markup + word count
//!  └─ 6. Export   markup → plain text → one-page PDF
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_summarize::{summarize, Document, Style, SummarizeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SummarizeConfig::default();
//!     let doc = Document::pasted("Rust is a systems language. It has no garbage collector.");
//!     let output = summarize(&doc, Style::Bullets, &config).await?;
//!     println!("{}", output.markup);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `summarize` binary (clap + anyhow + tracing-subscriber + indicatif + dotenvy) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-summarize = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{Style, SummarizeConfig, SummarizeConfigBuilder, SummarizerMode};
pub use document::{Document, SourceKind, TextEncoding};
pub use error::{RankError, SummarizeError};
pub use output::{SummaryOutput, SummaryStats};
pub use pipeline::input::{document_from_request, document_from_text, document_from_upload, Upload};
pub use pipeline::llm::{CompletionProvider, CompletionRequest, PromptMessage, Role};
pub use pipeline::segment::{DictionarySegmenter, WordSegmenter};
pub use progress::{NoopProgressCallback, ProgressCallback, SummaryProgressCallback};
pub use summarize::{
    render_markup_pdf, render_pdf, summarize, summarize_input, summarize_sync, write_pdf,
};
