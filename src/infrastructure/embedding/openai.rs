//! OpenAI embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::DomainError;
use crate::domain::embedding::{
    Embedding, EmbeddingInput, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse,
};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Known OpenAI embedding models and their dimensions
const EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("text-embedding-3-small", 1536),
    ("text-embedding-3-large", 3072),
    ("text-embedding-ada-002", 1536),
];

/// OpenAI embedding provider
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    /// Create a new OpenAI embedding provider
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    /// Create a new provider with custom base URL
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, request: &EmbeddingRequest) -> serde_json::Value {
        let input = match request.input() {
            EmbeddingInput::Single(s) => serde_json::json!(s),
            EmbeddingInput::Batch(v) => serde_json::json!(v),
        };

        serde_json::json!({
            "model": request.model(),
            "input": input,
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<EmbeddingResponse, DomainError> {
        let response: OpenAiEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(
                "openai",
                format!("Failed to parse embedding response: {}", e),
            )
        })?;

        let embeddings: Vec<Embedding> = response
            .data
            .into_iter()
            .map(|d| Embedding::new(d.index, d.embedding))
            .collect();

        Ok(EmbeddingResponse::new(response.model, embeddings))
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let url = self.embeddings_url();
        let body = self.build_request(&request);

        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &'static str {
        "text-embedding-3-small"
    }

    fn dimensions(&self, model: &str) -> Option<usize> {
        EMBEDDING_MODELS
            .iter()
            .find(|(name, _)| *name == model)
            .map(|(_, dims)| *dims)
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    model: String,
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}
