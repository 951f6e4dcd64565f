//! CLI binary for edgequake-summarize.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `SummarizeConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_summarize::pipeline::input::resolve_input;
use edgequake_summarize::pipeline::plain::to_plain;
use edgequake_summarize::{
    document_from_text, render_markup_pdf, summarize, write_pdf, DictionarySegmenter,
    ProgressCallback, Style, SummarizeConfig, SummarizerMode, SummaryProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Printed on stderr when the remote summarizer failed.
const FALLBACK_NOTICE: &str = "Falling back to offline summarizer.";

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner that turns into a chunk counter once the remote path knows how
/// many chunks it will send.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading input…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl SummaryProgressCallback for CliProgressCallback {
    fn on_summary_start(&self, mode: SummarizerMode, input_chars: usize) {
        self.bar.set_prefix("Summarising");
        self.bar.set_message(format!("{input_chars} chars, {mode} mode"));
    }

    fn on_chunk_start(&self, index: usize, total: usize) {
        if self.bar.length() != Some(total as u64) {
            let style = ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} chunks  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ");
            self.bar.set_length(total as u64);
            self.bar.set_style(style);
        }
        self.bar.set_message(format!("chunk {index}"));
    }

    fn on_chunk_complete(&self, index: usize, total: usize, summary_len: usize) {
        self.bar.println(format!(
            "  {} Chunk {:>3}/{:<3}  {}",
            green("✓"),
            index,
            total,
            dim(&format!("{summary_len:>5} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_merge_start(&self, partials: usize) {
        self.bar.set_message(format!("merging {partials} partial summaries"));
    }

    fn on_fallback(&self, reason: &str) {
        self.bar.println(format!("  {} {}", yellow("⚠"), dim(reason)));
    }

    fn on_summary_complete(&self, _sentences: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise a PDF as bullet points (offline)
  summarize report.pdf

  # Study notes from a text file, exported to PDF
  summarize notes.txt --style study --pdf-out notes-summary.pdf

  # Pasted text, remote model
  summarize --text "..." --mode remote --model gpt-4o-mini

  # Read from stdin, print plain text
  cat article.txt | summarize - --plain

  # Download and summarise
  summarize https://example.org/paper.pdf --json

ENVIRONMENT VARIABLES:
  SUMMARIZER_MODE         local (default) or anything else for remote
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Path to libpdfium (otherwise the system library is used)

A .env file in the working directory is loaded on start-up.
"#;

/// Summarise PDFs, text files and pasted text.
#[derive(Parser, Debug)]
#[command(
    name = "summarize",
    version,
    about = "Summarise PDFs, text files and pasted text",
    long_about = "Summarise PDF and plain-text documents with an offline extractive ensemble \
(LexRank + TextRank + LSA) or a remote LLM, then format the summary as bullets, an abstract \
or study notes and optionally export it as a one-page PDF.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local .pdf/.txt path, HTTP/HTTPS URL, or `-` for stdin.
    input: Option<String>,

    /// Summarise this text instead of INPUT.
    #[arg(long, conflicts_with = "input")]
    text: Option<String>,

    /// Presentation style.
    #[arg(long, env = "SUMMARIZE_STYLE", value_enum, default_value = "bullets")]
    style: StyleArg,

    /// Summarizer: `local`, anything else selects the remote provider.
    #[arg(long, env = "SUMMARIZER_MODE", default_value = "local")]
    mode: String,

    /// LLM provider: openai, anthropic, gemini, ollama.
    #[arg(long, env = "SUMMARIZE_PROVIDER", default_value = "openai")]
    provider: String,

    /// LLM model ID. Default: gpt-4o-mini.
    #[arg(long)]
    model: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "SUMMARIZE_TEMPERATURE", default_value_t = 0.3)]
    temperature: f32,

    /// Max LLM output tokens per call.
    #[arg(long, env = "SUMMARIZE_MAX_TOKENS", default_value_t = 700)]
    max_tokens: usize,

    /// Texts longer than this many characters are chunked for the remote model.
    #[arg(long, env = "SUMMARIZE_CHUNK_CHARS", default_value_t = 6000)]
    chunk_chars: usize,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "SUMMARIZE_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Frequency-ranked word list (one word per line) for splitting glued words.
    #[arg(long, env = "SUMMARIZE_WORDLIST")]
    wordlist: Option<PathBuf>,

    /// Largest accepted input file in bytes.
    #[arg(long, env = "SUMMARIZE_MAX_UPLOAD", default_value_t = 25 * 1024 * 1024)]
    max_upload: usize,

    /// Also render the summary to this one-page PDF.
    #[arg(long)]
    pdf_out: Option<PathBuf>,

    /// Print plain text instead of markup.
    #[arg(long, conflicts_with = "json")]
    plain: bool,

    /// Output structured JSON (SummaryOutput).
    #[arg(long)]
    json: bool,

    /// Disable progress spinner.
    #[arg(long, env = "SUMMARIZE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SUMMARIZE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SUMMARIZE_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "SUMMARIZE_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum StyleArg {
    Bullets,
    Abstract,
    Study,
}

impl From<StyleArg> for Style {
    fn from(v: StyleArg) -> Self {
        match v {
            StyleArg::Bullets => Style::Bullets,
            StyleArg::Abstract => Style::Abstract,
            StyleArg::Study => Style::Study,
        }
    }
}

/// Download pdfium into the cache, with a byte progress bar unless quiet.
fn ensure_pdf_engine(quiet: bool) -> Result<()> {
    if quiet {
        tokio::task::block_in_place(|| pdfium_auto::ensure_pdfium_library(None))
            .context("Failed to download PDFium engine")?;
        return Ok(());
    }

    let dl_bar = ProgressBar::new(0);
    dl_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {bytes}/{total_bytes}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    dl_bar.set_prefix("PDF engine");
    dl_bar.enable_steady_tick(Duration::from_millis(80));

    let bar = dl_bar.clone();
    tokio::task::block_in_place(|| {
        pdfium_auto::ensure_pdfium_library(Some(&|downloaded, total| {
            if let Some(t) = total {
                if bar.length().unwrap_or(0) != t {
                    bar.set_length(t);
                }
            }
            bar.set_position(downloaded);
        }))
    })
    .context("Failed to download PDFium engine")?;

    dl_bar.finish_with_message("ready");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn SummaryProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb).await?;

    // ── Ensure PDFium engine is available ───────────────────────────────────
    // Only PDF inputs need it. On the very first run the library (~30 MB) is
    // downloaded from bblanchon/pdfium-binaries and cached for later runs.
    let wants_pdf = cli.text.is_none()
        && cli.input.as_deref().is_some_and(|i| {
            i.to_ascii_lowercase().ends_with(".pdf") || i.starts_with("http")
        });
    if wants_pdf && !pdfium_auto::is_pdfium_cached() {
        ensure_pdf_engine(cli.quiet)?;
    }

    // ── Resolve input ────────────────────────────────────────────────────
    let document = match (&cli.text, &cli.input) {
        (Some(text), _) => document_from_text(text).context("No text to summarise")?,
        (None, Some(input)) => resolve_input(input, &config)
            .await
            .with_context(|| format!("Failed to read input '{input}'"))?,
        (None, None) => anyhow::bail!("Provide an INPUT path/URL, `-` for stdin, or --text"),
    };

    // ── Summarise ────────────────────────────────────────────────────────
    let output = summarize(&document, cli.style.clone().into(), &config)
        .await
        .context("Summarization failed")?;

    if output.fell_back && !cli.quiet {
        eprintln!("{}", yellow(FALLBACK_NOTICE));
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let text = if cli.plain {
            to_plain(&output.markup)
        } else {
            output.markup.clone()
        };
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
        if !text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    // ── Optional PDF export ──────────────────────────────────────────────
    if let Some(ref path) = cli.pdf_out {
        let bytes = render_markup_pdf(&output.markup).context("Failed to render PDF")?;
        write_pdf(&bytes, path)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !cli.quiet {
            eprintln!("{} PDF written to {}", green("✔"), path.display());
        }
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "{}",
            dim(&format!(
                "{} lines, {} words, {} mode, {}ms",
                output.stats.summary_lines,
                output.stats.word_count,
                output.mode,
                output.stats.total_duration_ms
            ))
        );
    }

    Ok(())
}

/// Map CLI args to `SummarizeConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SummarizeConfig> {
    let mut builder = SummarizeConfig::builder()
        .mode(SummarizerMode::parse(&cli.mode))
        .provider_name(cli.provider.clone())
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .remote_chunk_chars(cli.chunk_chars)
        .max_upload_bytes(cli.max_upload)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }

    if let Some(ref path) = cli.wordlist {
        let segmenter = DictionarySegmenter::from_file(path)
            .with_context(|| format!("Failed to load word list from {:?}", path))?;
        builder = builder.segmenter(Arc::new(segmenter));
    }

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
