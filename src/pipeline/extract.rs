//! PDF text extraction via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! pdfium is a C++ library with thread-local state; calling it from a Tokio
//! worker would stall the runtime on large documents. [`extract_text`] moves
//! the work onto the blocking pool.
//!
//! A page whose text layer cannot be read contributes an empty string; only
//! a document that cannot be opened at all is an error.

use crate::error::SummarizeError;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Turns PDF bytes into one string per page.
pub trait PdfTextExtractor: Send + Sync {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, SummarizeError>;
}

/// [`PdfTextExtractor`] backed by a pdfium shared library.
///
/// The library is bound on every call: `library_path` if given, else
/// through `pdfium_auto`, which honours `PDFIUM_LIB_PATH` and otherwise
/// downloads and caches the platform build on first use.
#[derive(Debug, Clone, Default)]
pub struct PdfiumExtractor {
    pub library_path: Option<PathBuf>,
}

impl PdfiumExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium, SummarizeError> {
        match &self.library_path {
            Some(path) => {
                debug!("Binding pdfium from {}", path.display());
                pdfium_auto::bind_pdfium_from_path(path)
            }
            None => pdfium_auto::bind_pdfium_silent(),
        }
        .map_err(|e| SummarizeError::PdfiumBindingFailed(e.to_string()))
    }
}

impl PdfTextExtractor for PdfiumExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, SummarizeError> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| SummarizeError::PdfReadFailed {
                detail: format!("{:?}", e),
            })?;

        let pages = document.pages();
        info!("PDF loaded: {} pages", pages.len());

        let mut texts = Vec::with_capacity(pages.len() as usize);
        for (idx, page) in pages.iter().enumerate() {
            match page.text() {
                Ok(text) => texts.push(text.all()),
                Err(e) => {
                    warn!("Page {}: text layer unreadable ({:?}), using empty text", idx + 1, e);
                    texts.push(String::new());
                }
            }
        }
        Ok(texts)
    }
}

/// Join page texts with a blank line between pages.
pub fn join_pages(pages: &[String]) -> String {
    pages.join("\n\n")
}

/// Extract the full text of a PDF off the async runtime.
pub async fn extract_text(
    extractor: Arc<dyn PdfTextExtractor>,
    bytes: Vec<u8>,
) -> Result<String, SummarizeError> {
    let pages = tokio::task::spawn_blocking(move || extractor.extract_pages(&bytes))
        .await
        .map_err(|e| SummarizeError::Internal(format!("PDF extraction task panicked: {}", e)))??;
    debug!("Extracted {} pages", pages.len());
    Ok(join_pages(&pages))
}

/// The configured extractor, or pdfium.
pub fn extractor_or_default(configured: Option<&Arc<dyn PdfTextExtractor>>) -> Arc<dyn PdfTextExtractor> {
    match configured {
        Some(e) => Arc::clone(e),
        None => Arc::new(PdfiumExtractor::new()),
    }
}
