//! Semantic cache domain models and traits
//!
//! Provides vector-based caching that matches semantically similar queries
//! rather than requiring exact key matches. Entries are namespaced per
//! document collection and expire by TTL.

mod config;
mod entry;
mod key;
mod store;

pub use config::SemanticCacheConfig;
pub use entry::{CacheEntry, CacheLookup, CacheMatch};
pub use key::{entry_key, namespace_pattern};
pub use store::SemanticCacheStore;
