//! Prompts for the remote summarizer.
//!
//! Every prompt lives here so unit tests can inspect them without a
//! provider. Callers can override the system prompt via
//! [`crate::config::SummarizeConfig::system_prompt`].

/// Default system prompt sent with every completion request.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a world-class summarizer. Write concise, factual summaries using clear headings and bullet points where helpful.";

/// Instruction prefixed to the text of a single chunk (or a short document).
pub const SUMMARY_USER_PREFIX: &str =
    "Summarize the following text. Preserve key facts, entities, data, and definitions.";

/// Instruction prefixed to the joined partial summaries in the merge call.
pub const MERGE_INSTRUCTION: &str = "Combine the following partial summaries into a single, coherent summary. Remove duplicates, maintain structure with clear headings, and include 5-10 key bullet points at the end.";

/// Build the user message for summarising `text`.
pub fn summary_user_message(text: &str) -> String {
    format!("{}\n\n{}", SUMMARY_USER_PREFIX, text)
}

/// Build the text of the merge request from the partial summaries.
///
/// The result is itself sent through [`summary_user_message`], so the merge
/// call uses the same system prompt and parameters as the chunk calls.
pub fn merge_request(partials: &[String]) -> String {
    format!("{}\n\n{}", MERGE_INSTRUCTION, partials.join("\n\n"))
}
