//! Semantic cache store implementations

mod in_memory;
mod redis;

pub use in_memory::InMemorySemanticCache;
pub use redis::{RedisCacheConfig, RedisSemanticCache};
