//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers (OpenAI, Cohere, etc.)
///
/// A provider maps text to fixed-length vectors; the dimension is determined
/// by the model and must be identical for all texts embedded with it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate embeddings for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the default model for this provider
    fn default_model(&self) -> &'static str;

    /// Get the embedding dimensions for a model
    fn dimensions(&self, model: &str) -> Option<usize>;
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::embedding::Embedding;

    /// Mock provider returning preset vectors per text, with a deterministic
    /// hash-derived fallback for texts without a preset. Identical text always
    /// produces an identical vector.
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        dimensions: usize,
        presets: Mutex<HashMap<String, Vec<f32>>>,
        error: Option<String>,
        calls: AtomicUsize,
    }

    impl MockEmbeddingProvider {
        pub fn new(dimensions: usize) -> Self {
            Self {
                dimensions,
                presets: Mutex::new(HashMap::new()),
                error: None,
                calls: AtomicUsize::new(0),
            }
        }

        /// Register a fixed vector for a specific input text
        pub fn with_embedding(self, text: impl Into<String>, vector: Vec<f32>) -> Self {
            self.presets.lock().unwrap().insert(text.into(), vector);
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        /// Number of embed calls made against this mock
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn vector_for(&self, text: &str) -> Vec<f32> {
            if let Some(preset) = self.presets.lock().unwrap().get(text) {
                return preset.clone();
            }

            let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            (0..self.dimensions)
                .map(|i| ((hash.wrapping_add(i as u64) % 1000) as f32 / 1000.0) - 0.5)
                .collect()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.provider_name(), error));
            }

            let embeddings: Vec<Embedding> = request
                .inputs()
                .iter()
                .enumerate()
                .map(|(idx, text)| Embedding::new(idx, self.vector_for(text)))
                .collect();

            Ok(EmbeddingResponse::new(
                request.model().to_string(),
                embeddings,
            ))
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }

        fn default_model(&self) -> &'static str {
            "mock-embedding"
        }

        fn dimensions(&self, _model: &str) -> Option<usize> {
            Some(self.dimensions)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_identical_text_is_reproducible() {
            let provider = MockEmbeddingProvider::new(64);

            let first = provider
                .embed(EmbeddingRequest::single("mock-embedding", "hello"))
                .await
                .unwrap();
            let second = provider
                .embed(EmbeddingRequest::single("mock-embedding", "hello"))
                .await
                .unwrap();

            assert_eq!(
                first.first().unwrap().vector(),
                second.first().unwrap().vector()
            );
            assert_eq!(provider.call_count(), 2);
        }

        #[tokio::test]
        async fn test_preset_vector_wins() {
            let provider =
                MockEmbeddingProvider::new(3).with_embedding("pinned", vec![1.0, 0.0, 0.0]);

            let response = provider
                .embed(EmbeddingRequest::single("mock-embedding", "pinned"))
                .await
                .unwrap();

            assert_eq!(response.first().unwrap().vector(), &[1.0, 0.0, 0.0]);
        }

        #[tokio::test]
        async fn test_batch_input() {
            let provider = MockEmbeddingProvider::new(16);
            let request = EmbeddingRequest::batch(
                "mock-embedding",
                vec!["one".to_string(), "two".to_string()],
            );

            let response = provider.embed(request).await.unwrap();

            assert_eq!(response.embeddings().len(), 2);
            assert_eq!(response.embeddings()[0].dimensions(), 16);
        }

        #[tokio::test]
        async fn test_error_mode() {
            let provider = MockEmbeddingProvider::new(8).with_error("API error");

            let result = provider
                .embed(EmbeddingRequest::single("mock-embedding", "hello"))
                .await;

            assert!(result.is_err());
        }
    }
}
