//! Vector retriever trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::RetrievedChunk;
use crate::domain::DomainError;

/// Trait for nearest-neighbor search over a collection of chunk embeddings
#[async_trait]
pub trait VectorRetriever: Send + Sync + Debug {
    /// Return the top-k chunks nearest to the query vector, ordered by
    /// descending similarity. The result may be shorter than `k`.
    async fn search(
        &self,
        collection_id: &str,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<RetrievedChunk>, DomainError>;

    /// Drop a collection and all its stored vectors
    async fn delete_collection(&self, collection_id: &str) -> Result<(), DomainError>;

    /// Backend reachability probe
    async fn health(&self) -> bool;

    /// Get the retriever name
    fn retriever_name(&self) -> &'static str;
}
