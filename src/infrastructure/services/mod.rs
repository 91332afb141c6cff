//! Application services composing the domain traits

mod query_service;
mod semantic_query_cache;

pub use query_service::{BackendHealth, QueryConfig, QueryService};
pub use semantic_query_cache::SemanticQueryCache;
