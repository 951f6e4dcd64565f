//! Error types for the edgequake-summarize library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`SummarizeError`] — **Fatal** for one request: the input was rejected
//!   (empty, wrong extension, too large), the PDF could not be opened, or the
//!   rendered document could not be written. Returned as
//!   `Err(SummarizeError)` from the top-level entry points.
//!
//! * [`RankError`] — **Non-fatal**: one of the three extractive ranking
//!   algorithms gave up on a document. The ensemble logs it and carries on
//!   with whatever the other rankers produced.
//!
//! Provider errors (`LlmApiError`, `ProviderNotConfigured`) are fatal only to
//! the remote adapter. [`crate::summarize::summarize`] catches them and falls
//! back to the local summarizer, so a host only sees them when it calls
//! [`crate::pipeline::llm::summarize_remote`] directly.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-summarize library.
#[derive(Debug, Error)]
pub enum SummarizeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Neither pasted text nor an uploaded file was provided.
    #[error("Please provide a PDF or paste some text to summarize.")]
    EmptyInput,

    /// Uploaded file extension is outside the accepted set.
    #[error("Only PDF or TXT files are supported (got '{filename}').")]
    UnsupportedFileType { filename: String },

    /// Upload exceeds the configured size limit.
    #[error("File '{filename}' is {size} bytes; the limit is {limit} bytes.")]
    FileTooLarge {
        filename: String,
        size: usize,
        limit: usize,
    },

    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a file path, `-`, or a valid HTTP/HTTPS URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The PDF could not be opened at all (individual pages never end up here).
    #[error("Failed to read PDF: {detail}")]
    PdfReadFailed { detail: String },

    /// Input was accepted but nothing readable survived repair.
    #[error("No readable text found in the provided input.")]
    NoReadableText,

    /// The download form was submitted without a summary.
    #[error("Nothing to download.")]
    NothingToDownload,

    // ── Provider errors ───────────────────────────────────────────────────
    /// The remote provider is not configured (missing credential etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The completion API returned an error (network, auth, quota, ...).
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// The PDF writer failed to serialise the document.
    #[error("Failed to render PDF: {0}")]
    RenderFailed(String),

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDF uploads need the pdfium shared library, normally downloaded on first use. You can:\n\
  • Check network access to github.com for the automatic download.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SummarizeError {
    /// Whether this error is a rejection the end user should see verbatim
    /// (missing input, bad file type, unreadable PDF) rather than an
    /// operator-facing failure.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            SummarizeError::EmptyInput
                | SummarizeError::UnsupportedFileType { .. }
                | SummarizeError::FileTooLarge { .. }
                | SummarizeError::PdfReadFailed { .. }
                | SummarizeError::NoReadableText
                | SummarizeError::NothingToDownload
        )
    }

    /// Whether this error comes from the remote completion path and should
    /// trigger the local fallback.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            SummarizeError::ProviderNotConfigured { .. } | SummarizeError::LlmApiError { .. }
        )
    }
}

/// A non-fatal error from a single ranking algorithm.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum RankError {
    /// No sentence contains a rankable word.
    #[error("{algorithm}: document has no rankable words")]
    EmptyVocabulary { algorithm: String },

    /// An iterative solver did not settle.
    #[error("{algorithm}: no convergence after {iterations} iterations")]
    NoConvergence { algorithm: String, iterations: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_file_display() {
        let e = SummarizeError::UnsupportedFileType {
            filename: "notes.docx".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Only PDF or TXT"), "got: {msg}");
        assert!(msg.contains("notes.docx"), "got: {msg}");
    }

    #[test]
    fn too_large_display() {
        let e = SummarizeError::FileTooLarge {
            filename: "big.pdf".into(),
            size: 30,
            limit: 25,
        };
        assert!(e.to_string().contains("30 bytes"));
        assert!(e.to_string().contains("25 bytes"));
    }

    #[test]
    fn pdf_read_failed_display() {
        let e = SummarizeError::PdfReadFailed {
            detail: "bad xref".into(),
        };
        assert_eq!(e.to_string(), "Failed to read PDF: bad xref");
    }

    #[test]
    fn user_facing_classification() {
        assert!(SummarizeError::EmptyInput.is_user_facing());
        assert!(SummarizeError::NoReadableText.is_user_facing());
        assert!(!SummarizeError::Internal("x".into()).is_user_facing());
        assert!(!SummarizeError::LlmApiError {
            message: "429".into()
        }
        .is_user_facing());
    }

    #[test]
    fn provider_error_classification() {
        assert!(SummarizeError::ProviderNotConfigured {
            provider: "openai".into(),
            hint: "set OPENAI_API_KEY".into(),
        }
        .is_provider_error());
        assert!(!SummarizeError::EmptyInput.is_provider_error());
    }

    #[test]
    fn rank_error_display() {
        let e = RankError::NoConvergence {
            algorithm: "lsa".into(),
            iterations: 100,
        };
        assert!(e.to_string().contains("lsa"));
        assert!(e.to_string().contains("100 iterations"));
    }
}
