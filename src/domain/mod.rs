//! Domain layer - core entities and collaborator traits

pub mod embedding;
pub mod error;
pub mod generation;
pub mod query;
pub mod retrieval;
pub mod semantic_cache;

pub use embedding::{
    Embedding, EmbeddingInput, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse,
    cosine_similarity,
};
pub use error::DomainError;
pub use generation::AnswerSynthesizer;
pub use query::{AnswerOrigin, QueryAnswer};
pub use retrieval::{RetrievedChunk, VectorRetriever};
pub use semantic_cache::{
    CacheEntry, CacheLookup, CacheMatch, SemanticCacheConfig, SemanticCacheStore,
};
