//! # Granary - Core API Documentation
//!
//! Granary is a small in-memory retrieval-augmented-generation (RAG) core for
//! Rust: it ingests PDF and plain-text documents, splits them into overlapping
//! word chunks, embeds the chunks through an external embedding API, and
//! answers natural-language questions by retrieving the most similar chunks
//! and asking a language model to synthesize a grounded answer from them.
//!
//! ## Features
//!
//! - **Multi-document store** keyed by caller-supplied names, with
//!   last-write-wins replacement on re-load and a single `clear` for the
//!   whole index
//! - **Overlapping word-window chunking** so sentences spanning a window
//!   boundary survive intact in at least one chunk
//! - **Provider-agnostic capability traits** (`EmbeddingModel` and
//!   `CompletionModel`) so the store is testable with deterministic mocks
//!   and portable across providers; a Gemini implementation of each ships in
//!   [`providers`]
//! - **Relevance gating**: the language model is only invoked when the best
//!   retrieved chunk clears a cosine-similarity threshold, the store's one
//!   defense against fabricated answers over irrelevant context
//!
//! ## Building a simple RAG session
//!
//! ```rust,no_run
//! use granary::prelude::*;
//! use granary::providers::{
//!     completions::GeminiCompletionModel, embeddings::GeminiEmbeddingModel,
//! };
//!
//! #[tokio::main]
//! async fn main() -> granary::Result<()> {
//!     let store = DocumentStore::new(
//!         GeminiEmbeddingModel::from_env()?,
//!         GeminiCompletionModel::from_env()?,
//!     );
//!
//!     store.load("/tmp/data/handbook.pdf", "handbook.pdf").await?;
//!     store.load("/tmp/data/notes.txt", "notes.txt").await?;
//!
//!     let answer = store.query("What does the handbook say about leave?").await;
//!     println!("{answer}");
//!
//!     store.clear().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature flags
//!
//! granary uses a set of feature flags to reduce the amount of compiled and
//! optional dependencies.
//!
//! The following optional features are available:
//!
//! Name | Description | Default?
//! ---|---|---
//! `pdf` | enables the text extractor to parse PDFs | No

/// Overlapping word-window text splitting
pub mod chunker;

/// Language model completion support
pub mod completion;

/// Document processing and representation utilities
///
/// Provides the core type pairing a document's chunks with their embedding
/// matrix for retrieval workflows.
pub mod document;

/// Text embeddings support
pub mod embeddings;

/// Error types for all library operations
pub mod error;

/// File-to-text extraction utilities
pub mod extract;

/// Convenience prelude exports
///
/// Re-exports commonly used types:
/// - the `DocumentStore` and its errors
/// - the `EmbeddingModel` and `CompletionModel` capability traits
pub mod prelude;

/// Builtin completion and embedding model providers
pub mod providers;

/// Document storage, retrieval and answer synthesis
pub mod vector_store;

pub use completion::CompletionModel;
pub use embeddings::model::{EmbeddingIntent, EmbeddingModel};
pub use error::{Error, Result};
pub use vector_store::DocumentStore;
