//! Qdrant vector retriever implementation

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::domain::DomainError;
use crate::domain::retrieval::{RetrievedChunk, VectorRetriever};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_QDRANT_URL: &str = "http://localhost:6333";

/// Qdrant retriever speaking the REST points API
#[derive(Debug)]
pub struct QdrantRetriever<C: HttpClientTrait> {
    client: C,
    base_url: String,
    api_key: Option<String>,
}

impl<C: HttpClientTrait> QdrantRetriever<C> {
    /// Create a new retriever against the default local Qdrant
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_QDRANT_URL)
    }

    /// Create a new retriever with custom base URL
    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Set the api-key header sent with every request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn search_url(&self, collection_id: &str) -> String {
        format!(
            "{}/collections/{}/points/search",
            self.base_url, collection_id
        )
    }

    fn collection_url(&self, collection_id: &str) -> String {
        format!("{}/collections/{}", self.base_url, collection_id)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(ref key) = self.api_key {
            headers.push(("api-key", key.as_str()));
        }

        headers
    }

    fn parse_search_response(
        &self,
        json: serde_json::Value,
    ) -> Result<Vec<RetrievedChunk>, DomainError> {
        let response: QdrantSearchResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("qdrant", format!("Failed to parse search response: {}", e))
        })?;

        Ok(response
            .result
            .unwrap_or_default()
            .into_iter()
            .map(|point| RetrievedChunk::new(point.score, point.payload.text, point.payload.source))
            .collect())
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorRetriever for QdrantRetriever<C> {
    async fn search(
        &self,
        collection_id: &str,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<RetrievedChunk>, DomainError> {
        let body = serde_json::json!({
            "vector": vector,
            "limit": k,
            "with_payload": true,
        });

        let response = self
            .client
            .post_json(&self.search_url(collection_id), self.headers(), &body)
            .await?;

        self.parse_search_response(response)
    }

    async fn delete_collection(&self, collection_id: &str) -> Result<(), DomainError> {
        self.client
            .delete(&self.collection_url(collection_id), self.headers())
            .await
    }

    async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);

        match self.client.get_json(&url, self.headers()).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Qdrant health check failed: {}", e);
                false
            }
        }
    }

    fn retriever_name(&self) -> &'static str {
        "qdrant"
    }
}

// Qdrant REST API response types

#[derive(Debug, Deserialize)]
struct QdrantSearchResponse {
    result: Option<Vec<QdrantScoredPoint>>,
}

#[derive(Debug, Deserialize)]
struct QdrantScoredPoint {
    score: f32,
    payload: QdrantChunkPayload,
}

#[derive(Debug, Deserialize)]
struct QdrantChunkPayload {
    text: String,
    source: String,
}
