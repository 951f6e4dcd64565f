//! Chunker: split long text into bounded windows for the remote provider.
//!
//! Windows are measured in characters, not bytes. When a window stops short
//! of the end of the text, the cut moves back to the last `". "` inside it,
//! provided that sentence end lies past 60% of the window. Otherwise the cut
//! falls on the hard boundary.

/// A contiguous slice of the line-ending-normalised input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Character offset of `text` in the normalised input.
    pub start: usize,
    /// The chunk, trimmed of surrounding whitespace. Never empty.
    pub text: String,
}

/// Fraction of the window a sentence end must lie beyond to become the cut.
const SENTENCE_CUT_RATIO: f64 = 0.6;

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Line endings are normalised to `\n` first; offsets refer to that form.
/// Empty or whitespace-only input yields no chunks. A `max_chars` of 0 is
/// treated as 1.
pub fn chunk(text: &str, max_chars: usize) -> Vec<Chunk> {
    if text.is_empty() {
        return Vec::new();
    }
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let max_chars = max_chars.max(1);

    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let length = bounds.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < length {
        let mut end = (start + max_chars).min(length);
        if end != length {
            let window = &text[bounds[start]..bounds[end]];
            if let Some(byte_pos) = window.rfind(". ") {
                let last_period = window[..byte_pos].chars().count();
                let threshold = (SENTENCE_CUT_RATIO * (end - start) as f64) as usize;
                if last_period > threshold {
                    end = start + last_period + 1;
                }
            }
        }

        let slice = &text[bounds[start]..bounds[end]];
        let trimmed = slice.trim();
        if !trimmed.is_empty() {
            let lead_bytes = slice.len() - slice.trim_start().len();
            let lead_chars = slice[..lead_bytes].chars().count();
            chunks.push(Chunk {
                start: start + lead_chars,
                text: trimmed.to_string(),
            });
        }
        start = end;
    }
    chunks
}

/// [`chunk`] without offsets.
pub fn chunk_texts(text: &str, max_chars: usize) -> Vec<String> {
    chunk(text, max_chars).into_iter().map(|c| c.text).collect()
}
