//! Application state for shared services

use std::sync::Arc;

use crate::domain::{DomainError, QueryAnswer};
use crate::infrastructure::services::BackendHealth;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub query_service: Arc<dyn QueryServiceTrait>,
}

/// Trait for query service operations
#[async_trait::async_trait]
pub trait QueryServiceTrait: Send + Sync {
    /// Answer a question against a collection
    async fn answer(&self, query: &str, collection_id: &str) -> Result<QueryAnswer, DomainError>;

    /// Clear a collection's cache namespace and stored vectors,
    /// returning the number of cache entries removed
    async fn clear_collection(&self, collection_id: &str) -> Result<usize, DomainError>;

    /// Probe backend reachability
    async fn health(&self) -> BackendHealth;
}
