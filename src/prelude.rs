pub use crate::chunker::split_into_chunks;
pub use crate::completion::{CompletionError, CompletionModel};
pub use crate::embeddings::{
    model::{EmbeddingIntent, EmbeddingModel},
    EmbedderError,
};
pub use crate::error::{Error, Result};
pub use crate::vector_store::{DocumentStore, LoadError};
