//! In-memory semantic cache store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::embedding::cosine_similarity;
use crate::domain::semantic_cache::{
    CacheEntry, CacheMatch, SemanticCacheStore, entry_key, namespace_pattern,
};

/// In-memory store using a linear namespace scan.
///
/// Suitable for development, tests and as a fallback when no external cache
/// backend is reachable. Bounded by `max_entries` with oldest-first eviction.
#[derive(Debug)]
pub struct InMemorySemanticCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    max_entries: usize,
}

const DEFAULT_MAX_ENTRIES: usize = 10_000;

impl InMemorySemanticCache {
    /// Create a store with the default capacity
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Create a store bounded to `max_entries`
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries,
        }
    }

    /// Number of live entries across all namespaces
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_if_needed(&self, entries: &mut HashMap<String, CacheEntry>) {
        if entries.len() < self.max_entries {
            return;
        }

        if let Some(oldest_key) = entries
            .iter()
            .min_by_key(|(_, entry)| entry.created_at())
            .map(|(key, _)| key.clone())
        {
            entries.remove(&oldest_key);
        }
    }
}

impl Default for InMemorySemanticCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SemanticCacheStore for InMemorySemanticCache {
    async fn find_similar(
        &self,
        collection_id: &str,
        embedding: &[f32],
        threshold: f32,
    ) -> Result<Option<CacheMatch>, DomainError> {
        let prefix = namespace_pattern(collection_id);
        let prefix = prefix.trim_end_matches('*');

        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::cache(format!("Failed to acquire read lock: {}", e)))?;

        let mut best: Option<CacheMatch> = None;

        for (key, entry) in entries.iter() {
            if !key.starts_with(prefix) || entry.is_expired() {
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
                best = Some(CacheMatch::new(entry.clone(), similarity));
            }
        }

        Ok(best)
    }

    async fn insert(&self, collection_id: &str, entry: CacheEntry) -> Result<(), DomainError> {
        let key = entry_key(collection_id, entry.query());

        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::cache(format!("Failed to acquire write lock: {}", e)))?;

        self.evict_if_needed(&mut entries);
        entries.insert(key, entry);

        Ok(())
    }

    async fn health(&self) -> bool {
        true
    }

    async fn clear(&self, collection_id: &str) -> Result<usize, DomainError> {
        let prefix = namespace_pattern(collection_id);
        let prefix = prefix.trim_end_matches('*');

        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::cache(format!("Failed to acquire write lock: {}", e)))?;

        let keys_to_remove: Vec<String> = entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();

        for key in &keys_to_remove {
            entries.remove(key);
        }

        Ok(keys_to_remove.len())
    }
}
