//! Top-level entry points: document → styled summary, markup → PDF.
//!
//! ## Flow
//!
//! ```text
//! Document ──▶ artefact pass (PDF only) ──▶ whitespace repair
//!          ──▶ local ensemble | remote adapter (falls back to local)
//!          ──▶ style formatter ──▶ SummaryOutput
//! ```
//!
//! Provider failures never surface from [`summarize`]: the local summarizer
//! takes over and the output records `fell_back` with the reason.

use crate::config::{Style, SummarizeConfig, SummarizerMode};
use crate::document::Document;
use crate::error::SummarizeError;
use crate::output::{SummaryOutput, SummaryStats};
use crate::pipeline::segment::{NoSegmenter, WordSegmenter};
use crate::pipeline::{input, layout, llm, local, plain, repair, style, tokenize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Summarise `document` and format the result in `style`.
///
/// # Errors
/// [`SummarizeError::NoReadableText`] when nothing survives repair. Remote
/// failures are not errors; see [`SummaryOutput::fell_back`].
pub async fn summarize(
    document: &Document,
    style: Style,
    config: &SummarizeConfig,
) -> Result<SummaryOutput, SummarizeError> {
    let total_start = Instant::now();
    tokenize::ensure_ready();

    // ── Step 1: Repair ───────────────────────────────────────────────────
    let segmenter: &dyn WordSegmenter = config.segmenter.as_deref().unwrap_or(&NoSegmenter);
    let text = if document.source.needs_artifact_pass() {
        repair::clean_pdf_artifacts(&document.text)
    } else {
        document.text.clone()
    };
    let repaired = repair::repair_whitespace(&text, segmenter);
    if repaired.trim().is_empty() {
        return Err(SummarizeError::NoReadableText);
    }
    let repaired_chars = repaired.chars().count();
    debug!(
        "Repaired {} input bytes into {} chars",
        document.byte_len, repaired_chars
    );

    let cb = config.progress_callback.as_ref();
    if let Some(cb) = cb {
        cb.on_summary_start(config.mode, repaired_chars);
    }

    // ── Step 2: Summarise ────────────────────────────────────────────────
    let mut mode = config.mode;
    let mut fallback_reason = None;
    let mut remote_calls = 0;
    let summary = match config.mode {
        SummarizerMode::Local => summarize_local_blocking(&repaired).await?,
        SummarizerMode::Remote => match summarize_remote_once(&repaired, config).await {
            Ok(remote) => {
                remote_calls = remote.calls;
                remote.summary
            }
            Err(e) => {
                warn!("Remote summarizer failed, using local: {}", e);
                if let Some(cb) = cb {
                    cb.on_fallback(&e.to_string());
                }
                mode = SummarizerMode::Local;
                fallback_reason = Some(e.to_string());
                summarize_local_blocking(&repaired).await?
            }
        },
    };

    // ── Step 3: Format ───────────────────────────────────────────────────
    let markup = style::format_summary(&summary, style);
    let summary_lines = summary.lines().filter(|l| !l.trim().is_empty()).count();
    if let Some(cb) = cb {
        cb.on_summary_complete(summary_lines);
    }

    let stats = SummaryStats {
        source: Some(document.source),
        encoding: Some(document.encoding),
        input_bytes: document.byte_len,
        repaired_chars,
        summary_lines,
        word_count: style::reported_word_count(&markup).unwrap_or(0),
        remote_calls,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Summary complete: {} mode, {} lines, {}ms",
        mode, summary_lines, stats.total_duration_ms
    );

    Ok(SummaryOutput {
        markup,
        summary,
        style,
        mode,
        fell_back: fallback_reason.is_some(),
        fallback_reason,
        stats,
    })
}

/// The rankers are CPU-bound; run them on the blocking pool.
async fn summarize_local_blocking(text: &str) -> Result<String, SummarizeError> {
    let text = text.to_string();
    tokio::task::spawn_blocking(move || local::summarize_local(&text))
        .await
        .map_err(|e| SummarizeError::Internal(format!("Local summarizer task panicked: {}", e)))
}

async fn summarize_remote_once(
    text: &str,
    config: &SummarizeConfig,
) -> Result<llm::RemoteSummary, SummarizeError> {
    let provider = llm::resolve_provider(config)?;
    llm::summarize_remote_with(provider.as_ref(), text, config).await
}

/// Synchronous wrapper around [`summarize`].
///
/// Creates a temporary tokio runtime internally.
pub fn summarize_sync(
    document: &Document,
    style: Style,
    config: &SummarizeConfig,
) -> Result<SummaryOutput, SummarizeError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SummarizeError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(summarize(document, style, config))
}

/// Resolve `input` (path, URL or `-`) and summarise it.
pub async fn summarize_input(
    input_str: impl AsRef<str>,
    style: Style,
    config: &SummarizeConfig,
) -> Result<SummaryOutput, SummarizeError> {
    let input_str = input_str.as_ref();
    info!("Summarising: {}", input_str);
    let document = input::resolve_input(input_str, config).await?;
    summarize(&document, style, config).await
}

/// Render plain text as a one-page PDF.
pub fn render_pdf(plain_text: &str) -> Result<Vec<u8>, SummarizeError> {
    layout::render_pdf(plain_text)
}

/// Convert formatter markup to plain text and render it.
///
/// Empty markup is [`SummarizeError::NothingToDownload`].
pub fn render_markup_pdf(markup: &str) -> Result<Vec<u8>, SummarizeError> {
    if markup.trim().is_empty() {
        return Err(SummarizeError::NothingToDownload);
    }
    layout::render_pdf(&plain::to_plain(markup))
}

/// Write rendered PDF bytes to `path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn write_pdf(bytes: &[u8], path: impl AsRef<Path>) -> Result<(), SummarizeError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SummarizeError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(|e| SummarizeError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| SummarizeError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
