use crate::embeddings::EmbedderError;
use async_trait::async_trait;

/// What the caller intends to do with the resulting vectors.
///
/// Providers may optimize the two directions differently, so text meant to be
/// searched is tagged distinctly from text meant to be matched against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingIntent {
    /// Text being indexed for later retrieval.
    Document,
    /// A question being matched against indexed text.
    Query,
}

#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Embeds every text in `texts`, returning one fixed-dimension vector per
    /// input in the same order.
    async fn embed(
        &self,
        texts: &[String],
        intent: EmbeddingIntent,
    ) -> Result<Vec<Vec<f64>>, EmbedderError>;
}
