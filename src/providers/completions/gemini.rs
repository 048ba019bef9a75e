use crate::completion::{CompletionError, CompletionModel};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, instrument};

const API_KEY_ENV_VAR: &str = "GRANARY_GEMINI_API_KEY";
const URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini text generation provider.
pub struct GeminiCompletionModel {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
    model: String,
}

impl GeminiCompletionModel {
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
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = std::env::var(API_KEY_ENV_VAR).map_err(|e| {
            let e = format!("Failed to fetch env var `{API_KEY_ENV_VAR}`!, {e}");
            error!(e);
            CompletionError::ProviderError(e)
        })?;
        Ok(Self::new(
            api_key,
            URL.to_string(),
            DEFAULT_MODEL.to_string(),
        ))
    }
}

#[derive(Deserialize)]
struct GeminiGenerateResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: String,
}

#[async_trait]
impl CompletionModel for GeminiCompletionModel {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError> {
        let request_body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(format!("{}/{}:generateContent", self.api_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| CompletionError::RequestError(e.to_string()))?;

        if response.status().is_success() {
            let response = response
                .json::<GeminiGenerateResponse>()
                .await
                .map_err(|e| CompletionError::ParseError(e.to_string()))?;

            let text: String = response
                .candidates
                .first()
                .map(|c| {
                    c.content
                        .parts
                        .iter()
                        .map(|p| p.text.as_str())
                        .collect::<Vec<_>>()
                        .join("")
                })
                .ok_or_else(|| {
                    CompletionError::ParseError("Response contained no candidates".to_string())
                })?;

            debug!(response_len = text.len(), "Completion received");
            Ok(text)
        } else {
            let error_message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            Err(CompletionError::ProviderError(error_message))
        }
    }
}
