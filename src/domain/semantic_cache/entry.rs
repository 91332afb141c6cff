//! Cache entry and lookup outcome types

use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// A cached question/answer pair with the question's embedding.
///
/// Entries are immutable once written; a new query always produces a new
/// entry. The embedding length must equal the embedding model's output
/// dimension so entries stay comparable within a namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The original query text (never mutated)
    query: String,
    /// The previously synthesized answer
    response: String,
    /// Embedding of the query text
    embedding: Vec<f32>,
    /// Creation time, seconds since the Unix epoch
    created_at: u64,
    /// Expiry time, seconds since the Unix epoch
    expires_at: u64,
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

impl CacheEntry {
    /// Create a new entry expiring `ttl` from now
    pub fn new(
        query: impl Into<String>,
        response: impl Into<String>,
        embedding: Vec<f32>,
        ttl: Duration,
    ) -> Self {
        let now = epoch_secs();

        Self {
            query: query.into(),
            response: response.into(),
            embedding,
            created_at: now,
            expires_at: now + ttl.as_secs(),
        }
    }

    /// Get the original query text
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Get the cached answer
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Get the query embedding
    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    /// Get creation timestamp (epoch seconds)
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Get expiry timestamp (epoch seconds)
    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    /// Remaining lifetime, `None` once expired
    pub fn ttl_remaining(&self) -> Option<Duration> {
        let now = epoch_secs();

        if now >= self.expires_at {
            None
        } else {
            Some(Duration::from_secs(self.expires_at - now))
        }
    }

    /// Check if the entry has outlived its TTL
    pub fn is_expired(&self) -> bool {
        epoch_secs() >= self.expires_at
    }

    #[cfg(test)]
    pub(crate) fn with_timestamps(mut self, created_at: u64, expires_at: u64) -> Self {
        self.created_at = created_at;
        self.expires_at = expires_at;
        self
    }
}

/// A cache entry that cleared the similarity threshold during lookup
#[derive(Debug, Clone)]
pub struct CacheMatch {
    /// The matching entry
    pub entry: CacheEntry,
    /// Cosine similarity between the lookup query and the entry
    pub similarity: f32,
}

impl CacheMatch {
    /// Create a new match
    pub fn new(entry: CacheEntry, similarity: f32) -> Self {
        Self { entry, similarity }
    }
}

/// Outcome of a text-level cache lookup.
///
/// `Degraded` marks a lookup that failed inside the cache layer and was
/// absorbed; callers treat it as a miss, but tests can tell the two apart.
#[derive(Debug, Clone)]
pub enum CacheLookup {
    /// An entry at or above the similarity threshold was found
    Hit(CacheMatch),
    /// No entry qualified
    Miss,
    /// The lookup failed and was swallowed; equivalent to a miss for callers
    Degraded,
}

impl CacheLookup {
    /// Whether this outcome is a hit
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    /// Whether the lookup was absorbed as degraded
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded)
    }

    /// The match, if any
    pub fn into_match(self) -> Option<CacheMatch> {
        match self {
            Self::Hit(m) => Some(m),
            _ => None,
        }
    }
}
