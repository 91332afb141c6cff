//! Query orchestration service
//!
//! Single entry point for answering a question against a collection: check
//! the semantic cache, fall back to retrieval plus synthesis, write the
//! fresh answer back, and return it tagged with its origin.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::DomainError;
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::generation::{AnswerSynthesizer, build_context, build_prompt, collect_sources};
use crate::domain::query::QueryAnswer;
use crate::domain::retrieval::VectorRetriever;
use crate::domain::semantic_cache::CacheLookup;

use super::SemanticQueryCache;

/// Answer returned when retrieval finds nothing to ground an answer on.
/// Never cached, so an empty collection cannot poison later lookups.
const NO_RESULTS_ANSWER: &str =
    "I could not find any relevant information in the uploaded documents to answer your question.";

/// Configuration for the query pipeline
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Number of chunks requested from the retriever
    pub top_k: usize,
    /// Embedding model used for retrieval query vectors
    pub embedding_model: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            embedding_model: "text-embedding-3-small".to_string(),
        }
    }
}

impl QueryConfig {
    /// Set the number of retrieved chunks
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the embedding model
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }
}

/// Aggregate reachability of the pipeline's backends
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BackendHealth {
    /// Cache store reachability
    pub cache: bool,
    /// Vector store reachability
    pub vector_db: bool,
}

impl BackendHealth {
    /// Whether every backend is reachable
    pub fn all_healthy(&self) -> bool {
        self.cache && self.vector_db
    }
}

/// Query orchestrator over the cache, retriever and synthesizer
#[derive(Debug)]
pub struct QueryService {
    cache: Arc<SemanticQueryCache>,
    embeddings: Arc<dyn EmbeddingProvider>,
    retriever: Arc<dyn VectorRetriever>,
    synthesizer: Arc<dyn AnswerSynthesizer>,
    config: QueryConfig,
}

impl QueryService {
    /// Create a new query service
    pub fn new(
        cache: Arc<SemanticQueryCache>,
        embeddings: Arc<dyn EmbeddingProvider>,
        retriever: Arc<dyn VectorRetriever>,
        synthesizer: Arc<dyn AnswerSynthesizer>,
        config: QueryConfig,
    ) -> Self {
        Self {
            cache,
            embeddings,
            retriever,
            synthesizer,
            config,
        }
    }

    /// Answer a question against a collection.
    ///
    /// A cache hit short-circuits retrieval and synthesis entirely. On a
    /// miss (or a degraded cache), embedding, retrieval and synthesis
    /// failures are fatal to the request; the write-back never is.
    pub async fn answer(
        &self,
        query: &str,
        collection_id: &str,
    ) -> Result<QueryAnswer, DomainError> {
        match self.cache.lookup(query, collection_id).await {
            CacheLookup::Hit(found) => {
                info!(
                    collection_id = %collection_id,
                    similarity = found.similarity,
                    "Answering from semantic cache"
                );
                return Ok(QueryAnswer::cached(found.entry.response(), found.similarity));
            }
            CacheLookup::Miss => {
                debug!(collection_id = %collection_id, "Cache miss, querying vector database");
            }
            CacheLookup::Degraded => {
                warn!(collection_id = %collection_id, "Cache degraded, querying vector database");
            }
        }

        let embedding = self.embed_query(query).await?;

        let chunks = self
            .retriever
            .search(collection_id, &embedding, self.config.top_k)
            .await?;

        if chunks.is_empty() {
            info!(collection_id = %collection_id, "No relevant chunks retrieved");
            return Ok(QueryAnswer::retrieved(NO_RESULTS_ANSWER, Vec::new()));
        }

        let context = build_context(&chunks);
        let sources = collect_sources(&chunks);
        let prompt = build_prompt(&context, query);

        let response = self.synthesizer.generate(&prompt).await?;

        self.cache.store(query, &response, collection_id).await;

        info!(
            collection_id = %collection_id,
            chunks = chunks.len(),
            "Answer synthesized from retrieved context"
        );

        Ok(QueryAnswer::retrieved(response, sources))
    }

    /// Clear a collection: drop its cache namespace and its stored vectors.
    /// Returns the number of cache entries removed.
    pub async fn clear_collection(&self, collection_id: &str) -> Result<usize, DomainError> {
        let removed = self.cache.clear(collection_id).await?;
        self.retriever.delete_collection(collection_id).await?;

        info!(
            collection_id = %collection_id,
            removed = removed,
            "Collection cleared"
        );

        Ok(removed)
    }

    /// Probe the cache and vector store backends
    pub async fn health(&self) -> BackendHealth {
        let (cache, vector_db) = tokio::join!(self.cache.health(), self.retriever.health());

        BackendHealth { cache, vector_db }
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::single(&self.config.embedding_model, query);
        let response = self.embeddings.embed(request).await?;

        response
            .first()
            .map(|e| e.vector().to_vec())
            .ok_or_else(|| DomainError::internal("No embedding returned"))
    }
}

#[async_trait::async_trait]
impl crate::api::state::QueryServiceTrait for QueryService {
    async fn answer(&self, query: &str, collection_id: &str) -> Result<QueryAnswer, DomainError> {
        QueryService::answer(self, query, collection_id).await
    }

    async fn clear_collection(&self, collection_id: &str) -> Result<usize, DomainError> {
        QueryService::clear_collection(self, collection_id).await
    }

    async fn health(&self) -> BackendHealth {
        QueryService::health(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::query::AnswerOrigin;
    use crate::domain::retrieval::{MockVectorRetriever, RetrievedChunk};
    use crate::domain::generation::MockAnswerSynthesizer;
    use crate::domain::semantic_cache::SemanticCacheConfig;
    use crate::infrastructure::semantic_cache::InMemorySemanticCache;

    struct Fixture {
        embeddings: Arc<MockEmbeddingProvider>,
        retriever: Arc<MockVectorRetriever>,
        synthesizer: Arc<MockAnswerSynthesizer>,
        service: QueryService,
    }

    fn fixture(
        embeddings: MockEmbeddingProvider,
        retriever: MockVectorRetriever,
        synthesizer: MockAnswerSynthesizer,
    ) -> Fixture {
        let embeddings = Arc::new(embeddings);
        let retriever = Arc::new(retriever);
        let synthesizer = Arc::new(synthesizer);

        let cache = Arc::new(SemanticQueryCache::with_config(
            Arc::new(InMemorySemanticCache::new()),
            embeddings.clone(),
            SemanticCacheConfig::default().with_embedding_model("mock-embedding"),
        ));

        let service = QueryService::new(
            cache,
            embeddings.clone(),
            retriever.clone(),
            synthesizer.clone(),
            QueryConfig::default().with_embedding_model("mock-embedding"),
        );

        Fixture {
            embeddings,
            retriever,
            synthesizer,
            service,
        }
    }

    fn refund_chunk() -> RetrievedChunk {
        RetrievedChunk::new(0.93, "Refunds are issued within 30 days", "policy.pdf")
    }

    #[tokio::test]
    async fn test_first_query_goes_through_retrieval() {
        let f = fixture(
            MockEmbeddingProvider::new(8),
            MockVectorRetriever::new().with_results(vec![refund_chunk()]),
            MockAnswerSynthesizer::new("Refunds take 30 days."),
        );

        let answer = f
            .service
            .answer("What is the refund policy?", "col-1")
            .await
            .unwrap();

        assert_eq!(answer.origin, AnswerOrigin::VectorDb);
        assert_eq!(answer.text, "Refunds take 30 days.");
        assert_eq!(answer.sources.unwrap(), vec!["policy.pdf"]);
        assert!(answer.similarity.is_none());
        assert_eq!(f.retriever.search_count(), 1);
    }

    #[tokio::test]
    async fn test_synthesizer_receives_marked_context() {
        let f = fixture(
            MockEmbeddingProvider::new(8),
            MockVectorRetriever::new().with_results(vec![refund_chunk()]),
            MockAnswerSynthesizer::new("Refunds take 30 days."),
        );

        f.service
            .answer("What is the refund policy?", "col-1")
            .await
            .unwrap();

        let prompts = f.synthesizer.received_prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("[1] Refunds are issued within 30 days"));
        assert!(prompts[0].contains("Question: What is the refund policy?"));
    }

    #[tokio::test]
    async fn test_second_identical_query_is_served_from_cache() {
        let f = fixture(
            MockEmbeddingProvider::new(8),
            MockVectorRetriever::new().with_results(vec![refund_chunk()]),
            MockAnswerSynthesizer::new("Refunds take 30 days."),
        );

        f.service
            .answer("What is the refund policy?", "col-1")
            .await
            .unwrap();

        let answer = f
            .service
            .answer("What is the refund policy?", "col-1")
            .await
            .unwrap();

        assert_eq!(answer.origin, AnswerOrigin::Cache);
        assert_eq!(answer.text, "Refunds take 30 days.");
        assert!((answer.similarity.unwrap() - 1.0).abs() < 1e-5);
        assert!(answer.sources.is_none());
        // the second query never reached the retriever or the synthesizer
        assert_eq!(f.retriever.search_count(), 1);
        assert_eq!(f.synthesizer.call_count(), 1);
    }

    #[tokio::test]
    async fn test_similar_query_hits_cache_without_retrieval() {
        let embeddings = MockEmbeddingProvider::new(2)
            .with_embedding("What is the refund policy?", vec![1.0, 0.0])
            // cos ≈ 0.894 to the original
            .with_embedding("What's your refund policy?", vec![0.894, 0.447]);
        let f = fixture(
            embeddings,
            MockVectorRetriever::new().with_results(vec![refund_chunk()]),
            MockAnswerSynthesizer::new("Refunds take 30 days."),
        );

        f.service
            .answer("What is the refund policy?", "col-1")
            .await
            .unwrap();

        let answer = f
            .service
            .answer("What's your refund policy?", "col-1")
            .await
            .unwrap();

        assert_eq!(answer.origin, AnswerOrigin::Cache);
        assert!(answer.similarity.unwrap() >= 0.85);
        assert_eq!(f.retriever.search_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_retrieval_returns_fixed_answer_without_synthesis() {
        let f = fixture(
            MockEmbeddingProvider::new(8),
            MockVectorRetriever::new(),
            MockAnswerSynthesizer::new("unused"),
        );

        let answer = f.service.answer("anything", "col-1").await.unwrap();

        assert_eq!(answer.origin, AnswerOrigin::VectorDb);
        assert_eq!(answer.text, NO_RESULTS_ANSWER);
        assert_eq!(answer.sources.unwrap(), Vec::<String>::new());
        assert_eq!(f.synthesizer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_retrieval_is_never_cached() {
        let f = fixture(
            MockEmbeddingProvider::new(8),
            MockVectorRetriever::new(),
            MockAnswerSynthesizer::new("unused"),
        );

        f.service.answer("anything", "col-1").await.unwrap();

        // the same query misses again and retrieval runs a second time
        let answer = f.service.answer("anything", "col-1").await.unwrap();

        assert_eq!(answer.origin, AnswerOrigin::VectorDb);
        assert_eq!(f.retriever.search_count(), 2);
    }

    #[tokio::test]
    async fn test_sources_deduplicated_in_order() {
        let f = fixture(
            MockEmbeddingProvider::new(8),
            MockVectorRetriever::new().with_results(vec![
                RetrievedChunk::new(0.9, "first", "a.pdf"),
                RetrievedChunk::new(0.8, "second", "b.pdf"),
                RetrievedChunk::new(0.7, "third", "a.pdf"),
            ]),
            MockAnswerSynthesizer::new("synthesized"),
        );

        let answer = f.service.answer("question", "col-1").await.unwrap();

        assert_eq!(answer.sources.unwrap(), vec!["a.pdf", "b.pdf"]);
    }

    #[tokio::test]
    async fn test_retriever_failure_fails_the_query() {
        let f = fixture(
            MockEmbeddingProvider::new(8),
            MockVectorRetriever::new().with_error("qdrant unreachable"),
            MockAnswerSynthesizer::new("unused"),
        );

        let result = f.service.answer("question", "col-1").await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_synthesizer_failure_fails_the_query_and_is_not_cached() {
        let f = fixture(
            MockEmbeddingProvider::new(8),
            MockVectorRetriever::new().with_results(vec![refund_chunk()]),
            MockAnswerSynthesizer::new("unused").with_error("rate limited"),
        );

        assert!(f.service.answer("question", "col-1").await.is_err());

        // nothing was written; replacing the synthesizer error would still
        // require retrieval, so the retriever is called again
        assert!(f.service.answer("question", "col-1").await.is_err());
        assert_eq!(f.retriever.search_count(), 2);
    }

    #[tokio::test]
    async fn test_embedding_failure_after_cache_degrades_fails_the_query() {
        let f = fixture(
            MockEmbeddingProvider::new(8).with_error("provider down"),
            MockVectorRetriever::new().with_results(vec![refund_chunk()]),
            MockAnswerSynthesizer::new("unused"),
        );

        let result = f.service.answer("question", "col-1").await;

        assert!(result.is_err());
        // cache lookup degraded, then the retrieval-side embed failed
        assert_eq!(f.embeddings.call_count(), 2);
        assert_eq!(f.retriever.search_count(), 0);
    }

    #[tokio::test]
    async fn test_clear_collection_empties_cache_and_vectors() {
        let f = fixture(
            MockEmbeddingProvider::new(8),
            MockVectorRetriever::new().with_results(vec![refund_chunk()]),
            MockAnswerSynthesizer::new("Refunds take 30 days."),
        );

        f.service
            .answer("What is the refund policy?", "col-1")
            .await
            .unwrap();

        let removed = f.service.clear_collection("col-1").await.unwrap();
        assert_eq!(removed, 1);

        // cache no longer answers; retrieval now sees the emptied store
        let answer = f
            .service
            .answer("What is the refund policy?", "col-1")
            .await
            .unwrap();
        assert_eq!(answer.text, NO_RESULTS_ANSWER);
    }

    #[tokio::test]
    async fn test_health_aggregates_backends() {
        let f = fixture(
            MockEmbeddingProvider::new(8),
            MockVectorRetriever::new().with_healthy(false),
            MockAnswerSynthesizer::new("unused"),
        );

        let health = f.service.health().await;

        assert!(health.cache);
        assert!(!health.vector_db);
        assert!(!health.all_healthy());
    }
}
