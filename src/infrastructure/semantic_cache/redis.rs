//! Redis-backed semantic cache store
//!
//! Entries are stored as JSON values under `cache:{collection_id}:{digest}`
//! keys with a server-side TTL. Approximate lookup scans the namespace with
//! SCAN and compares embeddings client-side; expiry is enforced by Redis and
//! re-checked on read.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::warn;

use crate::domain::DomainError;
use crate::domain::embedding::cosine_similarity;
use crate::domain::semantic_cache::{
    CacheEntry, CacheMatch, SemanticCacheStore, entry_key, namespace_pattern,
};

/// Configuration for the Redis store
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Connection timeout
    pub connection_timeout: Duration,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisCacheConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the connection timeout
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// Redis semantic cache store.
///
/// The ConnectionManager multiplexes one shared connection and reconnects on
/// failure, so a Redis restart never requires restarting this service.
#[derive(Clone)]
pub struct RedisSemanticCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisSemanticCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSemanticCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisSemanticCache {
    /// Connects to Redis and returns the store
    pub async fn connect(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    /// Connects with default configuration
    pub async fn with_url(url: impl Into<String>) -> Result<Self, DomainError> {
        Self::connect(RedisCacheConfig::new(url)).await
    }

    async fn scan_namespace(&self, collection_id: &str) -> Result<Vec<String>, DomainError> {
        let pattern = namespace_pattern(collection_id);
        let mut conn = self.connection.clone();

        let mut cursor = 0u64;
        let mut keys = Vec::new();

        loop {
            let (new_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache(format!(
                        "Failed to scan namespace '{}': {}",
                        collection_id, e
                    ))
                })?;

            keys.extend(batch);
            cursor = new_cursor;

            if cursor == 0 {
                break;
            }
        }

        Ok(keys)
    }
}

#[async_trait]
impl SemanticCacheStore for RedisSemanticCache {
    async fn find_similar(
        &self,
        collection_id: &str,
        embedding: &[f32],
        threshold: f32,
    ) -> Result<Option<CacheMatch>, DomainError> {
        let keys = self.scan_namespace(collection_id).await?;
        let mut conn = self.connection.clone();

        let mut best: Option<CacheMatch> = None;

        for key in keys {
            let raw: Option<String> = conn
                .get(&key)
                .await
                .map_err(|e| DomainError::cache(format!("Failed to get key '{}': {}", key, e)))?;

            let Some(raw) = raw else {
                continue;
            };

            let entry: CacheEntry = match serde_json::from_str(&raw) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(key = %key, "Skipping undecodable cache entry: {}", e);
                    continue;
                }
            };

            if entry.is_expired() {
                continue;
            }

            let similarity = cosine_similarity(embedding, entry.embedding());

            if similarity < threshold {
                continue;
            }

            let better = match &best {
                None => true,
                Some(current) => {
                    similarity > current.similarity
                        || (similarity == current.similarity
                            && entry.created_at() > current.entry.created_at())
                }
            };

            if better {
                best = Some(CacheMatch::new(entry, similarity));
            }
        }

        Ok(best)
    }

    async fn insert(&self, collection_id: &str, entry: CacheEntry) -> Result<(), DomainError> {
        let Some(ttl) = entry.ttl_remaining() else {
            return Ok(());
        };

        let key = entry_key(collection_id, entry.query());
        let value = serde_json::to_string(&entry)
            .map_err(|e| DomainError::cache(format!("Failed to serialize cache entry: {}", e)))?;

        let mut conn = self.connection.clone();
        let ttl_secs = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(&key, value, ttl_secs)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn health(&self) -> bool {
        let mut conn = self.connection.clone();

        let pong: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;

        match pong {
            Ok(reply) => reply == "PONG",
            Err(e) => {
                warn!("Redis health check failed: {}", e);
                false
            }
        }
    }

    async fn clear(&self, collection_id: &str) -> Result<usize, DomainError> {
        let keys = self.scan_namespace(collection_id).await?;

        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection.clone();

        let deleted: i64 = conn
            .del(&keys)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to delete keys: {}", e)))?;

        Ok(deleted as usize)
    }
}
