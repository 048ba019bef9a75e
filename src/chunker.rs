//! Splits extracted text into overlapping fixed-size word windows.
//!
//! Overlap preserves context that a hard window boundary would otherwise
//! sever (a sentence spanning a cut), at the cost of redundant storage.

/// Words per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 100;
/// Words shared between consecutive chunks.
pub const DEFAULT_OVERLAP: usize = 10;

/// Splits `text` into chunks of `size` words, each window advancing by
/// `size - overlap` words past the previous one.
///
/// If `overlap >= size` the step would be zero or negative, so overlap is
/// disabled and windows advance by a full `size` instead. The final partial
/// window is still emitted if non-empty; empty or whitespace-only windows are
/// dropped. Pure: the same input always yields the same chunk sequence, in
/// source order.
#[must_use]
pub fn split_into_chunks(text: &str, size: usize, overlap: usize) -> Vec<String> {
    if size == 0 {
        return Vec::new();
    }
    let words: Vec<&str> = text.split_whitespace().collect();

    let step = if overlap >= size { size } else { size - overlap };

    let mut chunks = Vec::new();
    for start in (0..words.len()).step_by(step) {
        let end = (start + size).min(words.len());
        let chunk = words[start..end].join(" ");
        if !chunk.trim().is_empty() {
            chunks.push(chunk);
        }
    }
    chunks
}
