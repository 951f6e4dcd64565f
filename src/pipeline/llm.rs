//! Remote summarizer: completion calls per chunk, then one merge call.
//!
//! The adapter talks to a [`CompletionProvider`], a narrow trait over "send
//! role-tagged messages, get text back". [`LlmCompletionProvider`] implements
//! it on top of `edgequake_llm`; tests implement it with scripted replies.
//!
//! Texts up to `remote_chunk_chars` characters go out in a single request.
//! Longer texts are chunked, each chunk summarised in turn, and the partial
//! summaries merged by one more request. Calls are sequential and never
//! retried: the first error aborts the attempt and the caller falls back to
//! the local summarizer.

use crate::config::SummarizeConfig;
use crate::error::SummarizeError;
use crate::pipeline::chunk::chunk_texts;
use crate::prompts::{merge_request, summary_user_message, SUMMARY_SYSTEM_PROMPT};
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Who a prompt message speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One single-shot chat completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<PromptMessage>,
    pub temperature: f32,
    pub max_tokens: usize,
}

/// A remote chat-completion capability.
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logs and diagnostics.
    fn name(&self) -> &str;

    /// Send `request` and return the completion text.
    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> BoxFuture<'a, Result<String, SummarizeError>>;
}

/// [`CompletionProvider`] backed by an `edgequake_llm` provider.
pub struct LlmCompletionProvider {
    name: String,
    inner: Arc<dyn LLMProvider>,
}

impl LlmCompletionProvider {
    pub fn new(name: impl Into<String>, inner: Arc<dyn LLMProvider>) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

impl CompletionProvider for LlmCompletionProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> BoxFuture<'a, Result<String, SummarizeError>> {
        Box::pin(async move {
            let messages: Vec<ChatMessage> = request
                .messages
                .iter()
                .map(|m| match m.role {
                    Role::System => ChatMessage::system(m.content.as_str()),
                    Role::User => ChatMessage::user(m.content.as_str()),
                })
                .collect();
            let options = CompletionOptions {
                temperature: Some(request.temperature),
                max_tokens: Some(request.max_tokens),
                ..Default::default()
            };
            let response = self
                .inner
                .chat(&messages, Some(&options))
                .await
                .map_err(|e| SummarizeError::LlmApiError {
                    message: e.to_string(),
                })?;
            debug!(
                "{}: {} input tokens, {} output tokens",
                self.name, response.prompt_tokens, response.completion_tokens
            );
            Ok(response.content)
        })
    }
}

/// Result of a remote summary, with the number of completion calls it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSummary {
    pub summary: String,
    pub calls: usize,
}

/// Summarise `text` with the provider resolved from `config`.
pub async fn summarize_remote(text: &str, config: &SummarizeConfig) -> Result<String, SummarizeError> {
    let provider = resolve_provider(config)?;
    Ok(summarize_remote_with(provider.as_ref(), text, config)
        .await?
        .summary)
}

/// Summarise `text` with an explicit provider.
pub async fn summarize_remote_with(
    provider: &dyn CompletionProvider,
    text: &str,
    config: &SummarizeConfig,
) -> Result<RemoteSummary, SummarizeError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(RemoteSummary {
            summary: String::new(),
            calls: 0,
        });
    }
    let cb = config.progress_callback.as_ref();

    if text.chars().count() <= config.remote_chunk_chars {
        if let Some(cb) = cb {
            cb.on_chunk_start(1, 1);
        }
        let summary = complete_once(provider, text, config).await?;
        if let Some(cb) = cb {
            cb.on_chunk_complete(1, 1, summary.len());
        }
        return Ok(RemoteSummary { summary, calls: 1 });
    }

    let chunks = chunk_texts(text, config.remote_chunk_chars);
    let total = chunks.len();
    info!(
        "Summarising {} chars in {} chunks via {}",
        text.chars().count(),
        total,
        provider.name()
    );

    let mut partials = Vec::with_capacity(total);
    for (i, chunk) in chunks.iter().enumerate() {
        if let Some(cb) = cb {
            cb.on_chunk_start(i + 1, total);
        }
        let partial = complete_once(provider, chunk, config).await?;
        if let Some(cb) = cb {
            cb.on_chunk_complete(i + 1, total, partial.len());
        }
        partials.push(partial);
    }

    if let Some(cb) = cb {
        cb.on_merge_start(partials.len());
    }
    let summary = complete_once(provider, &merge_request(&partials), config).await?;
    Ok(RemoteSummary {
        summary,
        calls: total + 1,
    })
}

/// Build the request for summarising `text`.
pub fn build_request(text: &str, config: &SummarizeConfig) -> CompletionRequest {
    let system = config
        .system_prompt
        .as_deref()
        .unwrap_or(SUMMARY_SYSTEM_PROMPT);
    CompletionRequest {
        messages: vec![
            PromptMessage::system(system),
            PromptMessage::user(summary_user_message(text)),
        ],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

async fn complete_once(
    provider: &dyn CompletionProvider,
    text: &str,
    config: &SummarizeConfig,
) -> Result<String, SummarizeError> {
    let start = Instant::now();
    let request = build_request(text, config);
    let content = provider.complete(&request).await?;
    debug!(
        "Completion of {} chars took {:?}",
        text.chars().count(),
        start.elapsed()
    );
    Ok(content.trim().to_string())
}

// ── Provider resolution ──────────────────────────────────────────────────────

/// Environment variable holding the credential for `provider`, if it needs one.
pub fn credential_env_var(provider: &str) -> Option<&'static str> {
    match provider.to_ascii_lowercase().as_str() {
        "openai" => Some("OPENAI_API_KEY"),
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        "gemini" | "google" => Some("GEMINI_API_KEY"),
        _ => None,
    }
}

/// Fail with [`SummarizeError::ProviderNotConfigured`] when `provider` needs
/// a credential that `lookup` cannot find.
pub fn check_credential(
    provider: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), SummarizeError> {
    let Some(var) = credential_env_var(provider) else {
        return Ok(());
    };
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(SummarizeError::ProviderNotConfigured {
            provider: provider.to_string(),
            hint: format!("Set {} in your environment or .env file.", var),
        }),
    }
}

/// Resolve the completion provider, from most to least specific.
///
/// 1. **Injected provider** (`config.provider`), used as-is.
/// 2. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`),
///    when both are set and non-empty.
/// 3. **Named provider** (`config.provider_name`, default `openai`) with
///    `config.model` or [`crate::config::DEFAULT_MODEL`].
///
/// Steps 2 and 3 check the provider's credential before building anything.
pub fn resolve_provider(
    config: &SummarizeConfig,
) -> Result<Arc<dyn CompletionProvider>, SummarizeError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let env = |k: &str| std::env::var(k).ok();
    if let (Some(prov), Some(model)) = (env("EDGEQUAKE_LLM_PROVIDER"), env("EDGEQUAKE_MODEL")) {
        if !prov.is_empty() && !model.is_empty() {
            check_credential(&prov, env)?;
            return create_provider(&prov, &model);
        }
    }

    check_credential(&config.provider_name, env)?;
    create_provider(&config.provider_name, config.model_or_default())
}

fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn CompletionProvider>, SummarizeError> {
    let inner = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        SummarizeError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })?;
    debug!("Using {} / {}", provider_name, model);
    Ok(Arc::new(LlmCompletionProvider::new(provider_name, inner)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::progress::SummaryProgressCallback;
    use crate::prompts::{MERGE_INSTRUCTION, SUMMARY_USER_PREFIX};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replies from a script and records every request.
    #[derive(Default)]
    pub(crate) struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String, String>>>,
        pub(crate) requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        pub(crate) fn new(script: Vec<Result<&'static str, &'static str>>) -> Self {
            Self {
                replies: Mutex::new(
                    script
                        .into_iter()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl CompletionProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn complete<'a>(
            &'a self,
            request: &'a CompletionRequest,
        ) -> BoxFuture<'a, Result<String, SummarizeError>> {
            self.requests.lock().unwrap().push(request.clone());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err("script exhausted".to_string()));
            Box::pin(async move { reply.map_err(|message| SummarizeError::LlmApiError { message }) })
        }
    }

    #[derive(Default)]
    struct Events {
        starts: AtomicUsize,
        completes: AtomicUsize,
        merges: AtomicUsize,
    }

    impl SummaryProgressCallback for Events {
        fn on_chunk_start(&self, _index: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }
        fn on_chunk_complete(&self, _index: usize, _total: usize, _len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_merge_start(&self, _partials: usize) {
            self.merges.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn long_text() -> String {
        "The committee reviewed the annual budget and approved two new projects. ".repeat(200)
    }

    #[tokio::test]
    async fn short_text_is_one_call() {
        let provider = ScriptedProvider::new(vec![Ok("  A short summary.  ")]);
        let config = SummarizeConfig::default();
        let out = summarize_remote_with(&provider, "Some text to summarise.", &config)
            .await
            .unwrap();
        assert_eq!(out.summary, "A short summary.");
        assert_eq!(out.calls, 1);

        let requests = provider.requests.lock().unwrap();
        let req = &requests[0];
        assert_eq!(req.temperature, 0.3);
        assert_eq!(req.max_tokens, 700);
        assert_eq!(req.messages[0], PromptMessage::system(SUMMARY_SYSTEM_PROMPT));
        assert_eq!(req.messages[1].role, Role::User);
        assert!(req.messages[1].content.starts_with(SUMMARY_USER_PREFIX));
        assert!(req.messages[1].content.ends_with("Some text to summarise."));
    }

    #[tokio::test]
    async fn long_text_is_chunked_then_merged() {
        let text = long_text();
        let chunks = chunk_texts(&text, 6000).len();
        assert!(chunks >= 2);

        let mut script: Vec<Result<&'static str, &'static str>> = vec![Ok("partial"); chunks];
        script.push(Ok("merged"));
        let provider = ScriptedProvider::new(script);
        let events = Arc::new(Events::default());
        let config = SummarizeConfig::builder()
            .progress_callback(events.clone())
            .build()
            .unwrap();

        let out = summarize_remote_with(&provider, &text, &config).await.unwrap();
        assert_eq!(out.summary, "merged");
        assert_eq!(out.calls, chunks + 1);
        assert_eq!(provider.calls(), chunks + 1);

        let requests = provider.requests.lock().unwrap();
        let merge = &requests.last().unwrap().messages[1].content;
        assert!(merge.contains(MERGE_INSTRUCTION));
        assert!(merge.ends_with(&vec!["partial"; chunks].join("\n\n")));

        assert_eq!(events.starts.load(Ordering::SeqCst), chunks);
        assert_eq!(events.completes.load(Ordering::SeqCst), chunks);
        assert_eq!(events.merges.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn first_failure_aborts_without_retry() {
        let provider = ScriptedProvider::new(vec![Ok("partial"), Err("HTTP 429"), Ok("unused")]);
        let err = summarize_remote_with(&provider, &long_text(), &SummarizeConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::LlmApiError { ref message } if message == "HTTP 429"));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn custom_system_prompt_is_used() {
        let provider = ScriptedProvider::new(vec![Ok("ok")]);
        let config = SummarizeConfig::builder()
            .system_prompt("Be brief.")
            .temperature(0.0)
            .build()
            .unwrap();
        summarize_remote_with(&provider, "text", &config).await.unwrap();
        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].messages[0].content, "Be brief.");
        assert_eq!(requests[0].temperature, 0.0);
    }

    #[tokio::test]
    async fn empty_text_makes_no_calls() {
        let provider = ScriptedProvider::default();
        let out = summarize_remote_with(&provider, "   ", &SummarizeConfig::default())
            .await
            .unwrap();
        assert_eq!(out.summary, "");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn injected_provider_wins() {
        let provider: Arc<dyn CompletionProvider> = Arc::new(ScriptedProvider::new(vec![Ok("done")]));
        let config = SummarizeConfig::builder().provider(provider).build().unwrap();
        assert_eq!(summarize_remote("Hello.", &config).await.unwrap(), "done");
    }

    #[test]
    fn missing_credential_is_not_configured() {
        let err = check_credential("openai", |_| None).unwrap_err();
        match err {
            SummarizeError::ProviderNotConfigured { provider, hint } => {
                assert_eq!(provider, "openai");
                assert!(hint.contains("OPENAI_API_KEY"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(check_credential("anthropic", |_| Some("  ".into())).is_err());
        assert!(check_credential("openai", |_| Some("sk-test".into())).is_ok());
        assert!(check_credential("ollama", |_| None).is_ok());
    }

    #[test]
    fn credential_vars_per_provider() {
        assert_eq!(credential_env_var("OpenAI"), Some("OPENAI_API_KEY"));
        assert_eq!(credential_env_var("gemini"), Some("GEMINI_API_KEY"));
        assert_eq!(credential_env_var("ollama"), None);
    }
}
