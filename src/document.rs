#[derive(Debug, Clone, PartialEq)]
/// A loaded document: its ordered chunks and their embedding matrix.
///
/// The two sequences are parallel, one embedding row per chunk in source
/// order. `chunks` is never empty for a stored document.
pub struct Document {
    /// Caller-supplied unique name, typically the uploaded filename.
    pub name: String,
    /// Overlapping word-window substrings of the extracted text.
    pub chunks: Vec<String>,
    /// One fixed-dimension vector per chunk, same order as `chunks`.
    pub embeddings: Vec<Vec<f64>>,
}

impl Document {
    pub fn new(name: String, chunks: Vec<String>, embeddings: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(chunks.len(), embeddings.len());
        Self {
            name,
            chunks,
            embeddings,
        }
    }
}
