//! Text-level semantic query cache
//!
//! Wraps a cache store and an embedding provider so callers deal in query
//! text, not vectors. Every failure inside this layer is absorbed: a broken
//! cache degrades lookups to misses and turns writes into no-ops, it never
//! fails the surrounding query.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, warn};

use crate::domain::DomainError;
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::semantic_cache::{
    CacheEntry, CacheLookup, SemanticCacheConfig, SemanticCacheStore,
};

/// Semantic cache service keyed by query text per collection
#[derive(Debug)]
pub struct SemanticQueryCache {
    store: Arc<dyn SemanticCacheStore>,
    embeddings: Arc<dyn EmbeddingProvider>,
    config: SemanticCacheConfig,
}

impl SemanticQueryCache {
    /// Create a new cache service with default config
    pub fn new(store: Arc<dyn SemanticCacheStore>, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_config(store, embeddings, SemanticCacheConfig::default())
    }

    /// Create a new cache service with custom config
    pub fn with_config(
        store: Arc<dyn SemanticCacheStore>,
        embeddings: Arc<dyn EmbeddingProvider>,
        config: SemanticCacheConfig,
    ) -> Self {
        Self {
            store,
            embeddings,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::single(&self.config.embedding_model, text);
        let response = self.embeddings.embed(request).await?;

        response
            .first()
            .map(|e| e.vector().to_vec())
            .ok_or_else(|| DomainError::internal("No embedding returned"))
    }

    /// Look up an approximately matching entry for `query`.
    ///
    /// Returns `Degraded` instead of an error when the embedding provider or
    /// the store fails; callers treat that exactly like a miss.
    pub async fn lookup(&self, query: &str, collection_id: &str) -> CacheLookup {
        if !self.config.enabled {
            return CacheLookup::Miss;
        }

        let embedding = match self.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Failed to embed query for cache lookup: {}", e);
                counter!("semantic_cache_degraded_total").increment(1);
                return CacheLookup::Degraded;
            }
        };

        match self
            .store
            .find_similar(collection_id, &embedding, self.config.similarity_threshold)
            .await
        {
            Ok(Some(found)) => {
                debug!(
                    collection_id = %collection_id,
                    similarity = found.similarity,
                    "Semantic cache hit"
                );
                counter!("semantic_cache_hits_total").increment(1);
                CacheLookup::Hit(found)
            }
            Ok(None) => {
                debug!(collection_id = %collection_id, "Semantic cache miss");
                counter!("semantic_cache_misses_total").increment(1);
                CacheLookup::Miss
            }
            Err(e) => {
                warn!("Cache lookup failed, treating as miss: {}", e);
                counter!("semantic_cache_degraded_total").increment(1);
                CacheLookup::Degraded
            }
        }
    }

    /// Write a query/response pair to the cache, best-effort.
    ///
    /// A failed write is logged and swallowed; it never affects the caller's
    /// answer.
    pub async fn store(&self, query: &str, response: &str, collection_id: &str) {
        if !self.config.enabled {
            return;
        }

        let embedding = match self.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Failed to embed query for caching: {}", e);
                return;
            }
        };

        let entry = CacheEntry::new(query, response, embedding, self.config.ttl());

        match self.store.insert(collection_id, entry).await {
            Ok(()) => debug!(collection_id = %collection_id, "Cached response for query"),
            Err(e) => warn!("Failed to write cache entry: {}", e),
        }
    }

    /// Backend reachability
    pub async fn health(&self) -> bool {
        self.store.health().await
    }

    /// Remove all entries for a collection, returning the count removed
    pub async fn clear(&self, collection_id: &str) -> Result<usize, DomainError> {
        self.store.clear(collection_id).await
    }
}
