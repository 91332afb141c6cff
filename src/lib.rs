//! Semantra
//!
//! Answers natural-language questions against ingested document collections,
//! preferring a semantic cache of previously answered questions over the
//! full retrieval-and-synthesis pipeline.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use api::state::AppState;
use domain::embedding::EmbeddingProvider;
use domain::generation::AnswerSynthesizer;
use domain::retrieval::VectorRetriever;
use domain::semantic_cache::{SemanticCacheConfig, SemanticCacheStore};
use infrastructure::embedding::OpenAiEmbeddingProvider;
use infrastructure::generation::OpenAiSynthesizer;
use infrastructure::http_client::HttpClient;
use infrastructure::retrieval::QdrantRetriever;
use infrastructure::semantic_cache::{InMemorySemanticCache, RedisSemanticCache};
use infrastructure::services::{QueryConfig, QueryService, SemanticQueryCache};

const OUTBOUND_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let http = HttpClient::with_timeout(OUTBOUND_HTTP_TIMEOUT);

    let embeddings: Arc<dyn EmbeddingProvider> = match &config.openai.base_url {
        Some(base_url) => Arc::new(OpenAiEmbeddingProvider::with_base_url(
            http.clone(),
            config.openai.api_key.clone(),
            base_url.as_str(),
        )),
        None => Arc::new(OpenAiEmbeddingProvider::new(
            http.clone(),
            config.openai.api_key.clone(),
        )),
    };

    let mut qdrant = QdrantRetriever::with_base_url(http.clone(), config.retrieval.url.as_str());
    if let Some(api_key) = &config.retrieval.api_key {
        qdrant = qdrant.with_api_key(api_key.clone());
    }
    let retriever: Arc<dyn VectorRetriever> = Arc::new(qdrant);

    let synthesizer: Arc<dyn AnswerSynthesizer> = {
        let synthesizer = match &config.openai.base_url {
            Some(base_url) => OpenAiSynthesizer::with_base_url(
                http,
                config.openai.api_key.clone(),
                base_url.as_str(),
            ),
            None => OpenAiSynthesizer::new(http, config.openai.api_key.clone()),
        };

        Arc::new(
            synthesizer
                .with_model(config.openai.chat_model.clone())
                .with_temperature(config.openai.temperature),
        )
    };

    let store = create_cache_store(config).await;

    let cache_config = SemanticCacheConfig::default()
        .with_enabled(config.cache.enabled)
        .with_similarity_threshold(config.cache.similarity_threshold)
        .with_ttl(Duration::from_secs(config.cache.ttl_secs))
        .with_embedding_model(config.openai.embedding_model.clone());

    let cache = Arc::new(SemanticQueryCache::with_config(
        store,
        embeddings.clone(),
        cache_config,
    ));

    let query_config = QueryConfig::default()
        .with_top_k(config.retrieval.top_k)
        .with_embedding_model(config.openai.embedding_model.clone());

    let query_service = Arc::new(QueryService::new(
        cache,
        embeddings,
        retriever,
        synthesizer,
        query_config,
    ));

    Ok(AppState { query_service })
}

/// Connect the cache backend, falling back to a process-local store when
/// Redis is unreachable: the cache is an optimization and must never keep
/// the service from starting.
async fn create_cache_store(config: &AppConfig) -> Arc<dyn SemanticCacheStore> {
    if !config.cache.enabled {
        return Arc::new(InMemorySemanticCache::new());
    }

    match RedisSemanticCache::with_url(config.cache.url.as_str()).await {
        Ok(store) => {
            info!("Connected to Redis at {}", config.cache.url);
            Arc::new(store)
        }
        Err(e) => {
            warn!(
                "Redis unavailable ({}), falling back to in-memory cache",
                e
            );
            Arc::new(InMemorySemanticCache::new())
        }
    }
}
