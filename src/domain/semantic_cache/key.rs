//! Cache key derivation
//!
//! Keys are a stable function of the exact query text, so re-storing the
//! same literal query overwrites its prior entry. Approximate matching
//! never goes through keys; it scans the namespace.

use sha2::{Digest, Sha256};

/// Hex prefix length of the query digest used in keys
const DIGEST_PREFIX_LEN: usize = 16;

/// Derive the storage key for a query within a collection namespace:
/// `cache:{collection_id}:{short-digest(query)}`
pub fn entry_key(collection_id: &str, query: &str) -> String {
    let digest = Sha256::digest(query.as_bytes());
    let mut short = hex::encode(digest);
    short.truncate(DIGEST_PREFIX_LEN);

    format!("cache:{}:{}", collection_id, short)
}

/// Glob pattern matching every key in a collection namespace
pub fn namespace_pattern(collection_id: &str) -> String {
    format!("cache:{}:*", collection_id)
}
