//! Vector retriever implementations

mod qdrant;

pub use qdrant::QdrantRetriever;
