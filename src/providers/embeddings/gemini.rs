use crate::embeddings::{
    model::{EmbeddingIntent, EmbeddingModel},
    EmbedderError,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

const API_KEY_ENV_VAR: &str = "GRANARY_GEMINI_API_KEY";
const URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "text-embedding-004";

/// Gemini embedding provider.
///
/// Batches all input texts into a single `batchEmbedContents` call, tagging
/// each entry with the task type matching the caller's [`EmbeddingIntent`].
pub struct GeminiEmbeddingModel {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
    model: String,
}

impl GeminiEmbeddingModel {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            api_key,
            api_url,
            client: reqwest::Client::new(),
            model,
        }
    }

    /// Builds a model reading the API key from `GRANARY_GEMINI_API_KEY`,
    /// with the default endpoint and model.
    pub fn from_env() -> Result<Self, EmbedderError> {
        let api_key = std::env::var(API_KEY_ENV_VAR).map_err(|e| {
            let e = format!("Failed to fetch env var `{API_KEY_ENV_VAR}`!, {e}");
            error!(e);
            EmbedderError::ProviderError(e)
        })?;
        Ok(Self::new(
            api_key,
            URL.to_string(),
            DEFAULT_MODEL.to_string(),
        ))
    }
}

fn task_type(intent: EmbeddingIntent) -> &'static str {
    match intent {
        EmbeddingIntent::Document => "RETRIEVAL_DOCUMENT",
        EmbeddingIntent::Query => "RETRIEVAL_QUERY",
    }
}

#[derive(Deserialize)]
struct GeminiEmbeddingResponse {
    embeddings: Vec<GeminiEmbeddingValues>,
}

#[derive(Deserialize)]
struct GeminiEmbeddingValues {
    values: Vec<f64>,
}

#[async_trait]
impl EmbeddingModel for GeminiEmbeddingModel {
    async fn embed(
        &self,
        texts: &[String],
        intent: EmbeddingIntent,
    ) -> Result<Vec<Vec<f64>>, EmbedderError> {
        let requests: Vec<_> = texts
            .iter()
            .map(|text| {
                json!({
                    "model": format!("models/{}", self.model),
                    "content": { "parts": [{ "text": text }] },
                    "taskType": task_type(intent),
                })
            })
            .collect();
        let request_body = json!({ "requests": requests });

        let response = self
            .client
            .post(format!("{}/{}:batchEmbedContents", self.api_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmbedderError::RequestError(e.to_string()))?;

        if response.status().is_success() {
            let response = response
                .json::<GeminiEmbeddingResponse>()
                .await
                .map_err(|e| EmbedderError::ParseError(e.to_string()))?;

            Ok(response
                .embeddings
                .into_iter()
                .map(|e| e.values)
                .collect())
        } else {
            let error_message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            Err(EmbedderError::ProviderError(error_message))
        }
    }
}
