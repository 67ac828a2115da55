//! Vector index collaborator trait

use async_trait::async_trait;

use crate::types::DocumentMeta;
use crate::RagError;

/// Storage backend for indexed documents.
///
/// Distances are non-negative and smaller means closer. The metric itself
/// is owned by the backend and treated as opaque here.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Add documents with their metadata. The three vectors are parallel.
    async fn add(
        &self,
        ids: Vec<String>,
        documents: Vec<String>,
        metadatas: Vec<DocumentMeta>,
    ) -> Result<(), RagError>;

    /// Query for the `top_k` closest documents to `text`.
    async fn query(
        &self,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<(String, DocumentMeta, f32)>, RagError>;

    /// Number of stored documents.
    async fn count(&self) -> Result<usize, RagError>;

    /// All stored documents with their metadata.
    async fn all(&self) -> Result<Vec<(String, DocumentMeta)>, RagError>;

    /// Delete every stored document and start fresh.
    async fn reset(&self) -> Result<(), RagError>;
}
