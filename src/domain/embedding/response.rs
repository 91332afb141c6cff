//! Embedding response types

use serde::{Deserialize, Serialize};

/// A single embedding vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    /// Index of this embedding in the batch
    index: usize,
    /// The embedding vector
    embedding: Vec<f32>,
}

impl Embedding {
    /// Create a new embedding
    pub fn new(index: usize, embedding: Vec<f32>) -> Self {
        Self { index, embedding }
    }

    /// Get the index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Get the embedding vector
    pub fn vector(&self) -> &[f32] {
        &self.embedding
    }

    /// Get the embedding dimensions
    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }

    /// Consume and return the vector
    pub fn into_vector(self) -> Vec<f32> {
        self.embedding
    }
}

/// Response from an embedding request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// Model used
    model: String,
    /// Generated embeddings
    data: Vec<Embedding>,
}

impl EmbeddingResponse {
    /// Create a new embedding response
    pub fn new(model: String, data: Vec<Embedding>) -> Self {
        Self { model, data }
    }

    /// Get the model used
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get all embeddings
    pub fn embeddings(&self) -> &[Embedding] {
        &self.data
    }

    /// Get the first embedding (for single input requests)
    pub fn first(&self) -> Option<&Embedding> {
        self.data.first()
    }

    /// Consume and return embeddings
    pub fn into_embeddings(self) -> Vec<Embedding> {
        self.data
    }
}
