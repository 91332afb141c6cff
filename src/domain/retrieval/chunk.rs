//! Retrieved chunk types

use serde::{Deserialize, Serialize};

/// A document chunk returned by a nearest-neighbor search.
///
/// Chunks are consumed transiently while building an answer and are never
/// persisted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Similarity score assigned by the vector store
    pub score: f32,
    /// Chunk text
    pub text: String,
    /// Label of the document the chunk came from
    pub source: String,
}

impl RetrievedChunk {
    /// Create a new retrieved chunk
    pub fn new(score: f32, text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            score,
            text: text.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_creation() {
        let chunk = RetrievedChunk::new(0.92, "Refunds are issued within 30 days", "policy.pdf");

        assert!((chunk.score - 0.92).abs() < 1e-6);
        assert_eq!(chunk.text, "Refunds are issued within 30 days");
        assert_eq!(chunk.source, "policy.pdf");
    }
}
