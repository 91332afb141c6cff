//! Semantic cache store trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::{CacheEntry, CacheMatch};
use crate::domain::DomainError;

/// Durable, namespaced storage of cache entries with approximate-match
/// lookup.
///
/// Lookup scans every live entry in the namespace: among entries whose
/// cosine similarity to the probe reaches the threshold, the strictly
/// highest similarity wins; exact ties break to the most recently created
/// entry. Expired entries never match. Lookup cost is linear in the size of
/// the namespace, which is expected to stay small (bounded by the distinct
/// questions asked per collection).
#[async_trait]
pub trait SemanticCacheStore: Send + Sync + Debug {
    /// Find the best entry in `collection_id` at or above `threshold`
    /// similarity to `embedding`, or `None` if no entry qualifies.
    async fn find_similar(
        &self,
        collection_id: &str,
        embedding: &[f32],
        threshold: f32,
    ) -> Result<Option<CacheMatch>, DomainError>;

    /// Write an entry under the key derived from the collection and the
    /// entry's exact query text, overwriting any prior entry for that text.
    async fn insert(&self, collection_id: &str, entry: CacheEntry) -> Result<(), DomainError>;

    /// Backend reachability probe; says nothing about lookup correctness
    async fn health(&self) -> bool;

    /// Delete every entry in the namespace, returning the count removed.
    /// An empty namespace clears to 0 without error.
    async fn clear(&self, collection_id: &str) -> Result<usize, DomainError>;
}
