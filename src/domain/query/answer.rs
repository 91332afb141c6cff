//! Answer types returned by the query pipeline

use serde::{Deserialize, Serialize};

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerOrigin {
    /// Served from the semantic cache without retrieval or synthesis
    Cache,
    /// Produced by retrieval and synthesis against the vector database
    VectorDb,
}

/// The result of answering a query.
///
/// `similarity` is present only for cache hits; `sources` only for
/// vector-db answers (and may be empty when retrieval found nothing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnswer {
    /// The answer text
    pub text: String,
    /// Origin of the answer
    pub origin: AnswerOrigin,
    /// Similarity of the matched cache entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    /// Deduplicated source labels of the cited chunks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl QueryAnswer {
    /// An answer served from the cache
    pub fn cached(text: impl Into<String>, similarity: f32) -> Self {
        Self {
            text: text.into(),
            origin: AnswerOrigin::Cache,
            similarity: Some(similarity),
            sources: None,
        }
    }

    /// An answer produced by retrieval and synthesis
    pub fn retrieved(text: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            text: text.into(),
            origin: AnswerOrigin::VectorDb,
            similarity: None,
            sources: Some(sources),
        }
    }
}
