//! Semantic cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the semantic query cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Whether semantic caching is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Similarity threshold for cache hits (0.0 to 1.0).
    /// An entry qualifies only at or above this value.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Time-to-live for cached entries in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Embedding model used for query vectors
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

fn default_enabled() -> bool {
    true
}

fn default_similarity_threshold() -> f32 {
    0.85
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            similarity_threshold: default_similarity_threshold(),
            ttl_secs: default_ttl_secs(),
            embedding_model: default_embedding_model(),
        }
    }
}

impl SemanticCacheConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Set whether caching is enabled
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_secs = ttl.as_secs();
        self
    }

    /// Set the embedding model
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }
}
