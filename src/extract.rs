//! Reads a file into a single text blob, dispatching on its extension.
//!
//! Extraction failures never cross this boundary: an unsupported extension,
//! an unreadable file or a parse failure is logged and degrades to an empty
//! string, which makes the caller skip the document.

use std::path::Path;
use tracing::warn;

/// Extracts the text content of the file at `path`.
///
/// PDFs (requires the `pdf` feature) have their per-page text concatenated;
/// `.txt` files are read raw. Anything else, including read or parse
/// failures, yields `""`.
#[must_use]
pub fn extract_text(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("pdf") => extract_pdf(path),
        Some("txt") => match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read text file {}: {e}", path.display());
                String::new()
            }
        },
        _ => {
            warn!("Unsupported file type: {}", path.display());
            String::new()
        }
    }
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path) -> String {
    match pdf_extract::extract_text(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to parse PDF {}: {e}", path.display());
            String::new()
        }
    }
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(path: &Path) -> String {
    warn!(
        "PDF support not enabled, skipping {} (build with the `pdf` feature)",
        path.display()
    );
    String::new()
}
