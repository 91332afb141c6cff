//! Infrastructure layer - external service implementations

pub mod embedding;
pub mod generation;
pub mod http_client;
pub mod logging;
pub mod retrieval;
pub mod semantic_cache;
pub mod services;
