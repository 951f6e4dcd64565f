//! Configuration types for summarization.
//!
//! All request-independent behaviour is controlled through
//! [`SummarizeConfig`], built via its [`SummarizeConfigBuilder`]. The
//! presentation [`Style`] is chosen per request and therefore lives outside
//! the config.
//!
//! # Design choice: builder over constructor
//! Most callers only touch the mode and perhaps the model; the builder lets
//! them rely on the documented defaults for everything else.

use crate::error::SummarizeError;
use crate::pipeline::extract::PdfTextExtractor;
use crate::pipeline::llm::CompletionProvider;
use crate::pipeline::segment::WordSegmenter;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default model for the remote path.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default upload limit: 25 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Configuration for a summarization request.
///
/// Built via [`SummarizeConfig::builder()`] or using
/// [`SummarizeConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_summarize::{SummarizeConfig, SummarizerMode};
///
/// let config = SummarizeConfig::builder()
///     .mode(SummarizerMode::Remote)
///     .model("gpt-4o-mini")
///     .build()
///     .unwrap();
/// assert_eq!(config.mode, SummarizerMode::Remote);
/// ```
#[derive(Clone)]
pub struct SummarizeConfig {
    /// Which summarizer runs by default. Default: [`SummarizerMode::Local`].
    pub mode: SummarizerMode,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama"). Default: "openai".
    pub provider_name: String,

    /// LLM model identifier. If None, uses [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// Pre-constructed completion provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn CompletionProvider>>,

    /// Sampling temperature for every completion call. Default: 0.3.
    pub temperature: f32,

    /// Output token cap for every completion call. Default: 700.
    pub max_tokens: usize,

    /// Texts longer than this (in characters) are chunked before the remote
    /// provider sees them. Default: 6000.
    pub remote_chunk_chars: usize,

    /// Custom system prompt. If None, uses [`crate::prompts::SUMMARY_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Largest accepted upload in bytes. Default: 25 MiB.
    pub max_upload_bytes: usize,

    /// Accepted upload extensions, lowercase, without the dot. Default: `pdf`, `txt`.
    pub allowed_extensions: Vec<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Splits glued lowercase runs into words during repair. Default: none
    /// (tokens are left intact).
    pub segmenter: Option<Arc<dyn WordSegmenter>>,

    /// PDF text source. If None, pdfium is bound on first use.
    pub pdf_extractor: Option<Arc<dyn PdfTextExtractor>>,

    /// Optional progress callback for remote chunk events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            mode: SummarizerMode::default(),
            provider_name: "openai".to_string(),
            model: None,
            provider: None,
            temperature: 0.3,
            max_tokens: 700,
            remote_chunk_chars: 6000,
            system_prompt: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: vec!["pdf".to_string(), "txt".to_string()],
            download_timeout_secs: 120,
            segmenter: None,
            pdf_extractor: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummarizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizeConfig")
            .field("mode", &self.mode)
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("remote_chunk_chars", &self.remote_chunk_chars)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("allowed_extensions", &self.allowed_extensions)
            .field("segmenter", &self.segmenter.as_ref().map(|_| "<dyn WordSegmenter>"))
            .field("pdf_extractor", &self.pdf_extractor.as_ref().map(|_| "<dyn PdfTextExtractor>"))
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

impl SummarizeConfig {
    /// Create a new builder for `SummarizeConfig`.
    pub fn builder() -> SummarizeConfigBuilder {
        SummarizeConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model the remote path will ask for.
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Whether `filename` carries one of the accepted extensions.
    pub fn accepts_extension(&self, filename: &str) -> bool {
        match file_extension(filename) {
            Some(ext) => self.allowed_extensions.iter().any(|a| *a == ext),
            None => false,
        }
    }
}

/// Lowercased extension after the last dot, if any.
pub(crate) fn file_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

/// Builder for [`SummarizeConfig`].
pub struct SummarizeConfigBuilder {
    config: SummarizeConfig,
}

impl fmt::Debug for SummarizeConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizeConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl SummarizeConfigBuilder {
    pub fn mode(mut self, mode: SummarizerMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn remote_chunk_chars(mut self, n: usize) -> Self {
        self.config.remote_chunk_chars = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn max_upload_bytes(mut self, n: usize) -> Self {
        self.config.max_upload_bytes = n;
        self
    }

    pub fn allowed_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.allowed_extensions = exts
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn segmenter(mut self, segmenter: Arc<dyn WordSegmenter>) -> Self {
        self.config.segmenter = Some(segmenter);
        self
    }

    pub fn pdf_extractor(mut self, extractor: Arc<dyn PdfTextExtractor>) -> Self {
        self.config.pdf_extractor = Some(extractor);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummarizeConfig, SummarizeError> {
        let c = &self.config;
        if c.remote_chunk_chars < 200 {
            return Err(SummarizeError::InvalidConfig(format!(
                "remote chunk size must be ≥ 200 characters, got {}",
                c.remote_chunk_chars
            )));
        }
        if c.max_tokens == 0 {
            return Err(SummarizeError::InvalidConfig(
                "max tokens must be ≥ 1".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(SummarizeError::InvalidConfig(
                "upload limit must be ≥ 1 byte".into(),
            ));
        }
        if c.allowed_extensions.is_empty() {
            return Err(SummarizeError::InvalidConfig(
                "at least one upload extension must be accepted".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which summarizer the default flow uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerMode {
    /// Offline extractive ensemble. (default)
    #[default]
    Local,
    /// Remote completion provider, falling back to local on any error.
    Remote,
}

impl SummarizerMode {
    /// Parse a mode string. Only `local` (case-insensitive) selects the local
    /// summarizer; every other non-empty value selects the remote one.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("local") {
            SummarizerMode::Local
        } else {
            SummarizerMode::Remote
        }
    }

    /// Read `SUMMARIZER_MODE` from the environment, defaulting to local.
    pub fn from_env() -> Self {
        std::env::var("SUMMARIZER_MODE")
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }
}

impl fmt::Display for SummarizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummarizerMode::Local => f.write_str("local"),
            SummarizerMode::Remote => f.write_str("remote"),
        }
    }
}

/// Presentation style applied to a plain summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// One list item per sentence. (default)
    #[default]
    Bullets,
    /// Sentences as running prose.
    Abstract,
    /// Overview, key points and generated review questions.
    Study,
}

impl Style {
    /// Parse a style tag. Unrecognised tags fall back to [`Style::Bullets`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "abstract" => Style::Abstract,
            "study" => Style::Study,
            _ => Style::Bullets,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Bullets => "bullets",
            Style::Abstract => "abstract",
            Style::Study => "study",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
