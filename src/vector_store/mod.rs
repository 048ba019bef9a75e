mod document_store;

pub use document_store::DocumentStore;

use crate::embeddings::EmbedderError;
use thiserror::Error;

/// Minimum best-match cosine similarity required before the generation step
/// is invoked. Below this the store reports that nothing relevant was found
/// instead of letting the model answer over irrelevant context.
pub const RELEVANCE_THRESHOLD: f64 = 0.40;

/// How many chunks of the winning document are handed to the model.
pub const TOP_K_CHUNKS: usize = 3;

/// Fixed reply when the store holds no documents.
pub const NO_DOCUMENTS_MESSAGE: &str = "No documents loaded. Please upload a PDF first.";

/// Fixed reply when no chunk clears [`RELEVANCE_THRESHOLD`].
pub const NO_MATCH_MESSAGE: &str =
    "Sorry, I couldn't find anything relevant in any of the uploaded documents.";

/// Fixed reply when the question itself could not be embedded.
pub const EMBED_FAILED_MESSAGE: &str = "Failed to embed the question, please try again.";

/// Fixed reply when the generation call fails.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate answer using LLM.";

#[derive(Debug, Error)]
pub enum LoadError {
    /// Extraction produced no text, or the text chunked to nothing. The
    /// document is skipped; no provider call is made.
    #[error("No readable content in document `{0}`")]
    EmptyDocument(String),
    /// The embedding provider call failed; the store is left untouched.
    #[error("Embedding failed")]
    Embedding(#[from] EmbedderError),
    /// The provider answered with a different number of vectors than chunks
    /// submitted, which would break the chunk/embedding pairing.
    #[error("Embedding response had {got} vectors for {expected} chunks")]
    EmbeddingMismatch { expected: usize, got: usize },
}

/// Normalized dot product of two vectors, in `[-1, 1]`.
///
/// Zero-norm or length-mismatched inputs score 0.0 rather than NaN.
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
