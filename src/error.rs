use crate::{
    completion::CompletionError, embeddings::EmbedderError, vector_store::LoadError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Completion error")]
    Completion(#[from] CompletionError),
    #[error("Embedder error")]
    Embedder(#[from] EmbedderError),
    #[error("Load error")]
    Load(#[from] LoadError),
}

pub type Result<T> = std::result::Result<T, Error>;
