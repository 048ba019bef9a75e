use std::cmp::Ordering;
use std::path::Path;

use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::chunker::{split_into_chunks, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
use crate::completion::CompletionModel;
use crate::document::Document;
use crate::embeddings::model::{EmbeddingIntent, EmbeddingModel};
use crate::extract::extract_text;

use super::{
    cosine_similarity, LoadError, EMBED_FAILED_MESSAGE, GENERATION_FAILED_MESSAGE,
    NO_DOCUMENTS_MESSAGE, NO_MATCH_MESSAGE, RELEVANCE_THRESHOLD, TOP_K_CHUNKS,
};

const CONTEXT_SEPARATOR: &str = "\n---\n";

/// In-memory multi-document store with retrieval and answer synthesis.
///
/// Owns every loaded document's chunks and embedding matrix; nothing outlives
/// its entry. Construct one per hosting process and hand it by reference to
/// whatever serves requests. Mutations and reads go through a single lock,
/// which is never held across a provider call.
pub struct DocumentStore<E, C> {
    /// Insertion-ordered: cross-document score ties go to the document
    /// loaded first.
    documents: RwLock<Vec<Document>>,
    embedding_model: E,
    completion_model: C,
}

impl<E: EmbeddingModel, C: CompletionModel> DocumentStore<E, C> {
    pub fn new(embedding_model: E, completion_model: C) -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            embedding_model,
            completion_model,
        }
    }

    /// Extracts, chunks and embeds the file at `path`, storing the result
    /// under `name`. A prior entry for `name` is replaced wholesale.
    ///
    /// On any failure the store keeps its prior state: an unreadable or
    /// empty file is skipped before any provider call, and an embedding
    /// failure aborts before the insert.
    pub async fn load(&self, path: impl AsRef<Path>, name: impl Into<String>) -> Result<(), LoadError> {
        let name = name.into();
        let path = path.as_ref();
        info!("Loading document `{name}` from {}", path.display());

        let text = extract_text(path);
        let chunks = split_into_chunks(&text, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP);
        if chunks.is_empty() {
            warn!("Skipping embedding: no content found in `{name}`");
            return Err(LoadError::EmptyDocument(name));
        }
        debug!("Split `{name}` into {} chunks", chunks.len());

        let embeddings = self
            .embedding_model
            .embed(&chunks, EmbeddingIntent::Document)
            .await?;
        if embeddings.len() != chunks.len() {
            return Err(LoadError::EmbeddingMismatch {
                expected: chunks.len(),
                got: embeddings.len(),
            });
        }
        info!("Embedded {} chunks for document `{name}`", embeddings.len());

        let document = Document::new(name, chunks, embeddings);
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|d| d.name == document.name) {
            Some(entry) => *entry = document,
            None => documents.push(document),
        }
        Ok(())
    }

    /// Answers `question` from the loaded documents.
    ///
    /// Retrieval is winner-take-all by document: every document's chunks are
    /// scored against the question, and the top chunks of the single
    /// best-scoring document become the model's context. Never fails; every
    /// error path maps to a fixed user-facing message.
    pub async fn query(&self, question: &str) -> String {
        if self.is_empty().await {
            return NO_DOCUMENTS_MESSAGE.to_string();
        }

        let query_vector = match self
            .embedding_model
            .embed(&[question.to_string()], EmbeddingIntent::Query)
            .await
        {
            Ok(mut vectors) if !vectors.is_empty() => vectors.remove(0),
            Ok(_) => {
                error!("Embedding provider returned no vector for the question");
                return EMBED_FAILED_MESSAGE.to_string();
            }
            Err(e) => {
                error!("Failed to embed question: {e}");
                return EMBED_FAILED_MESSAGE.to_string();
            }
        };

        let (best_score, best_chunks) = {
            let documents = self.documents.read().await;
            let mut best_score = f64::NEG_INFINITY;
            let mut best_chunks: Vec<String> = Vec::new();

            for document in documents.iter() {
                let similarities: Vec<f64> = document
                    .embeddings
                    .iter()
                    .map(|embedding| cosine_similarity(&query_vector, embedding))
                    .collect();

                // stable sort keeps equal-scoring chunks in source order
                let mut indices: Vec<usize> = (0..similarities.len()).collect();
                indices.sort_by(|&a, &b| {
                    similarities[b]
                        .partial_cmp(&similarities[a])
                        .unwrap_or(Ordering::Equal)
                });
                indices.truncate(TOP_K_CHUNKS);

                let Some(&top) = indices.first() else { continue };
                if similarities[top] > best_score {
                    best_score = similarities[top];
                    best_chunks = indices
                        .iter()
                        .map(|&i| document.chunks[i].clone())
                        .collect();
                }
            }
            (best_score, best_chunks)
        };

        info!("Highest similarity score across all documents: {best_score:.4}");
        if best_score < RELEVANCE_THRESHOLD {
            return NO_MATCH_MESSAGE.to_string();
        }

        let context = best_chunks.join(CONTEXT_SEPARATOR);
        let prompt = grounding_prompt(question, &context);
        match self.completion_model.generate(&prompt).await {
            Ok(answer) => answer.trim().to_string(),
            Err(e) => {
                error!("LLM generation failed: {e}");
                GENERATION_FAILED_MESSAGE.to_string()
            }
        }
    }

    /// Drops every document. Idempotent.
    pub async fn clear(&self) {
        let mut documents = self.documents.write().await;
        documents.clear();
        info!("RAG context cleared");
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Names of the currently indexed documents, in load order.
    pub async fn document_names(&self) -> Vec<String> {
        self.documents
            .read()
            .await
            .iter()
            .map(|d| d.name.clone())
            .collect()
    }
}

/// Instruction + retrieved context + question, constraining the model to
/// answer only from the supplied context and to admit when the answer is
/// absent.
fn grounding_prompt(question: &str, context: &str) -> String {
    format!(
        "You are a helpful assistant. Synthesize a concise answer \
         to the user's question based ONLY on the following CONTEXTS. \
         Combine information from all relevant contexts. \
         If the answer is not present, state that you cannot find the information.\n\n\
         ---CONTEXTS---\n{context}\n\n\
         ---QUESTION---\n{question}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionError;
    use crate::embeddings::EmbedderError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::{Arc, Mutex};

    /// Embeds each document text as a unit vector whose cosine against the
    /// query vector `[1, 0]` equals the score configured for that text.
    /// Unconfigured texts score 0.0. Texts containing `fail_marker` make the
    /// whole batch fail, for provider-error paths.
    struct MockEmbeddingModel {
        scores: HashMap<String, f64>,
        fail_marker: Option<String>,
    }

    impl MockEmbeddingModel {
        fn new(scores: &[(&str, f64)]) -> Self {
            Self {
                scores: scores
                    .iter()
                    .map(|(text, score)| (text.to_string(), *score))
                    .collect(),
                fail_marker: None,
            }
        }

        fn failing_on(marker: &str, scores: &[(&str, f64)]) -> Self {
            let mut model = Self::new(scores);
            model.fail_marker = Some(marker.to_string());
            model
        }
    }

    #[async_trait]
    impl EmbeddingModel for MockEmbeddingModel {
        async fn embed(
            &self,
            texts: &[String],
            intent: EmbeddingIntent,
        ) -> Result<Vec<Vec<f64>>, EmbedderError> {
            if let Some(marker) = &self.fail_marker {
                if texts.iter().any(|t| t.contains(marker)) {
                    return Err(EmbedderError::ProviderError("quota exceeded".to_string()));
                }
            }
            Ok(texts
                .iter()
                .map(|text| match intent {
                    EmbeddingIntent::Query => vec![1.0, 0.0],
                    EmbeddingIntent::Document => {
                        let score = self.scores.get(text).copied().unwrap_or(0.0);
                        vec![score, (1.0 - score * score).sqrt()]
                    }
                })
                .collect())
        }
    }

    struct MockCompletionModel {
        response: String,
        calls: Arc<AtomicUsize>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl MockCompletionModel {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                calls: Arc::new(AtomicUsize::new(0)),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(AtomicOrdering::SeqCst)
        }

        fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl CompletionModel for MockCompletionModel {
        async fn generate(&self, prompt: &str) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.response.clone())
        }
    }

    struct FailingCompletionModel;

    #[async_trait]
    impl CompletionModel for FailingCompletionModel {
        async fn generate(&self, _prompt: &str) -> Result<String, CompletionError> {
            Err(CompletionError::ProviderError("model overloaded".to_string()))
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn write_doc(dir: &tempfile::TempDir, file_name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(file_name);
        fs::write(&path, content).unwrap();
        path
    }

    fn numbered_words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[tokio::test]
    async fn test_query_on_empty_store() {
        init_tracing();
        let store = DocumentStore::new(MockEmbeddingModel::new(&[]), MockCompletionModel::new("x"));

        let answer = store.query("anything").await;

        assert_eq!(answer, NO_DOCUMENTS_MESSAGE);
        assert_eq!(store.completion_model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "a.txt", "alpha beta gamma");
        let store = DocumentStore::new(
            MockEmbeddingModel::new(&[("alpha beta gamma", 0.9)]),
            MockCompletionModel::new("x"),
        );
        store.load(&path, "a.txt").await.unwrap();
        assert_eq!(store.len().await, 1);

        store.clear().await;
        assert!(store.is_empty().await);
        store.clear().await;
        assert!(store.is_empty().await);

        assert_eq!(store.query("anything").await, NO_DOCUMENTS_MESSAGE);
    }

    #[tokio::test]
    async fn test_load_keeps_chunks_and_embeddings_parallel() {
        let dir = tempfile::tempdir().unwrap();
        // 250 words -> windows 0..100, 90..190, 180..250
        let path = write_doc(&dir, "a.txt", &numbered_words(250));
        let store = DocumentStore::new(MockEmbeddingModel::new(&[]), MockCompletionModel::new("x"));

        store.load(&path, "a.txt").await.unwrap();

        let documents = store.documents.read().await;
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].chunks.len(), 3);
        assert_eq!(documents[0].chunks.len(), documents[0].embeddings.len());
    }

    #[tokio::test]
    async fn test_reload_replaces_document_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_doc(&dir, "v1.txt", "old content here");
        let second = write_doc(&dir, "v2.txt", "new content entirely");
        let store = DocumentStore::new(MockEmbeddingModel::new(&[]), MockCompletionModel::new("x"));

        store.load(&first, "doc.txt").await.unwrap();
        store.load(&second, "doc.txt").await.unwrap();

        let documents = store.documents.read().await;
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].chunks, vec!["new content entirely".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "empty.txt", "   \n  ");
        let store = DocumentStore::new(MockEmbeddingModel::new(&[]), MockCompletionModel::new("x"));

        let result = store.load(&path, "empty.txt").await;

        assert!(matches!(result, Err(LoadError::EmptyDocument(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_embedding_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_doc(&dir, "good.txt", "reliable content");
        let bad = write_doc(&dir, "bad.txt", "content that should FAIL to embed");
        let store = DocumentStore::new(
            MockEmbeddingModel::failing_on("FAIL", &[]),
            MockCompletionModel::new("x"),
        );

        store.load(&good, "good.txt").await.unwrap();
        let result = store.load(&bad, "bad.txt").await;

        assert!(matches!(result, Err(LoadError::Embedding(_))));
        assert_eq!(store.document_names().await, vec!["good.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_winner_take_all_retrieves_only_best_document() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let a = write_doc(&dir, "a.txt", "alpha beta gamma");
        let b = write_doc(&dir, "b.txt", "delta epsilon zeta");
        let store = DocumentStore::new(
            MockEmbeddingModel::new(&[
                ("alpha beta gamma", 0.9),
                ("delta epsilon zeta", 0.3),
            ]),
            MockCompletionModel::new("grounded answer"),
        );
        store.load(&a, "a.txt").await.unwrap();
        store.load(&b, "b.txt").await.unwrap();

        let answer = store.query("which letters?").await;

        assert_eq!(answer, "grounded answer");
        let prompt = store.completion_model.last_prompt().unwrap();
        assert!(prompt.contains("alpha beta gamma"));
        assert!(!prompt.contains("delta epsilon zeta"));
        assert!(prompt.contains("which letters?"));
    }

    #[tokio::test]
    async fn test_below_threshold_skips_generation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "a.txt", "faintly related words");
        let store = DocumentStore::new(
            MockEmbeddingModel::new(&[("faintly related words", 0.35)]),
            MockCompletionModel::new("should never appear"),
        );
        store.load(&path, "a.txt").await.unwrap();

        let answer = store.query("something else entirely").await;

        assert_eq!(answer, NO_MATCH_MESSAGE);
        assert_eq!(store.completion_model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_answer_is_returned_verbatim_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "a.txt", "highly relevant words");
        let store = DocumentStore::new(
            MockEmbeddingModel::new(&[("highly relevant words", 0.95)]),
            MockCompletionModel::new("  The answer is 42.  \n"),
        );
        store.load(&path, "a.txt").await.unwrap();

        assert_eq!(store.query("what is it?").await, "The answer is 42.");
    }

    #[tokio::test]
    async fn test_low_score_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "a.txt", "unrelated words here");
        let store = DocumentStore::new(
            MockEmbeddingModel::new(&[("unrelated words here", 0.10)]),
            MockCompletionModel::new("should never appear"),
        );
        store.load(&path, "a.txt").await.unwrap();

        assert_eq!(store.query("unrelated question").await, NO_MATCH_MESSAGE);
        assert_eq!(store.completion_model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_equal_scores_keep_chunk_source_order() {
        let dir = tempfile::tempdir().unwrap();
        let text = numbered_words(250);
        let path = write_doc(&dir, "a.txt", &text);
        let chunks = split_into_chunks(&text, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP);
        let scores: Vec<(&str, f64)> = chunks.iter().map(|c| (c.as_str(), 0.8)).collect();
        let store = DocumentStore::new(
            MockEmbeddingModel::new(&scores),
            MockCompletionModel::new("ok"),
        );
        store.load(&path, "a.txt").await.unwrap();

        store.query("anything").await;

        let prompt = store.completion_model.last_prompt().unwrap();
        let positions: Vec<usize> = chunks
            .iter()
            .map(|c| prompt.find(c.as_str()).expect("chunk missing from prompt"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_score_tie_across_documents_goes_to_first_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_doc(&dir, "a.txt", "first document words");
        let b = write_doc(&dir, "b.txt", "second document words");
        let store = DocumentStore::new(
            MockEmbeddingModel::new(&[
                ("first document words", 0.7),
                ("second document words", 0.7),
            ]),
            MockCompletionModel::new("ok"),
        );
        store.load(&a, "a.txt").await.unwrap();
        store.load(&b, "b.txt").await.unwrap();

        store.query("anything").await;

        let prompt = store.completion_model.last_prompt().unwrap();
        assert!(prompt.contains("first document words"));
        assert!(!prompt.contains("second document words"));
    }

    #[tokio::test]
    async fn test_generation_failure_maps_to_fixed_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "a.txt", "highly relevant words");
        let store = DocumentStore::new(
            MockEmbeddingModel::new(&[("highly relevant words", 0.95)]),
            FailingCompletionModel,
        );
        store.load(&path, "a.txt").await.unwrap();

        assert_eq!(store.query("what is it?").await, GENERATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_query_embedding_failure_maps_to_fixed_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "a.txt", "some indexed words");
        let store = DocumentStore::new(
            MockEmbeddingModel::failing_on("doomed", &[]),
            MockCompletionModel::new("x"),
        );
        store.load(&path, "a.txt").await.unwrap();

        let answer = store.query("a doomed question").await;

        assert_eq!(answer, EMBED_FAILED_MESSAGE);
        assert_eq!(store.completion_model.call_count(), 0);
    }
}
