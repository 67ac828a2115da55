//! Knowledge base retrieval for the support agent
//!
//! Features:
//! - FAQ ingestion with overwrite policy
//! - Vector search via a pluggable `VectorIndex` collaborator
//! - Chroma HTTP store implementation
//! - Context formatting for prompt grounding

pub mod chroma;
pub mod knowledge;
pub mod store;
pub mod types;

pub use chroma::{ChromaConfig, ChromaStore};
pub use knowledge::KnowledgeBase;
pub use store::VectorIndex;
pub use types::{DocumentMeta, FaqEntry, KnowledgeStats, SearchHit, SearchResult};

use thiserror::Error;

/// RAG errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<RagError> for support_agent_core::Error {
    fn from(err: RagError) -> Self {
        support_agent_core::Error::Rag(err.to_string())
    }
}
