//! Pipeline stages for document summarization.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own and can be swapped (e.g. a different PDF engine) without touching
//! the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ repair ──▶ local | llm ──▶ style ──▶ plain ──▶ layout
//! (form/    (pdfium)   (+segment)  (rank)  (chunk)  (markup)  (text)    (PDF)
//!  path/URL)
//! ```
//!
//! 1. [`input`]    — turn pasted text, uploads, paths or URLs into a `Document`
//! 2. [`extract`]  — PDF bytes to page text; `spawn_blocking` because pdfium
//!    is not async-safe
//! 3. [`repair`]   — PDF artefact cleanup and whitespace repair, with an
//!    optional [`segment`] word splitter
//! 4. [`local`]    — extractive ensemble over the [`rank`] algorithms, using
//!    the [`tokenize`] sentence splitter
//! 5. [`llm`]      — remote summaries over [`chunk`]ed text; the only stage
//!    with network I/O
//! 6. [`style`]    — bullets / abstract / study markup
//! 7. [`plain`]    — markup back to plain text for export
//! 8. [`layout`]   — one-page PDF

pub mod chunk;
pub mod extract;
pub mod input;
pub mod layout;
pub mod llm;
pub mod local;
pub mod plain;
pub mod rank;
pub mod repair;
pub mod segment;
pub mod style;
pub mod tokenize;
