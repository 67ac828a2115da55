//! Knowledge base adapter over a vector index

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::store::VectorIndex;
use crate::types::{DocumentMeta, FaqEntry, KnowledgeStats, SearchHit, SearchResult};
use crate::RagError;

const SOURCE_TAG: &str = "faqs.json";

const EMPTY_CONTEXT: &str = "No relevant information found in the knowledge base.";

/// FAQ knowledge base over a pluggable vector index.
///
/// Retrieval failures are absorbed: `search` degrades to an empty result so
/// the response pipeline keeps going without grounding.
pub struct KnowledgeBase {
    index: Arc<dyn VectorIndex>,
}

impl KnowledgeBase {
    pub fn new(index: Arc<dyn VectorIndex>) -> Self {
        Self { index }
    }

    /// Ingest FAQ entries into the index.
    ///
    /// A populated index is refused unless `overwrite` is set, in which case
    /// the collection is reset first. Returns the number of entries stored.
    pub async fn ingest(&self, entries: &[FaqEntry], overwrite: bool) -> Result<usize, RagError> {
        if entries.is_empty() {
            return Ok(0);
        }

        let mut seen = HashSet::new();
        for entry in entries {
            if entry.id.trim().is_empty() {
                return Err(RagError::Validation(
                    "FAQ entry has an empty id".to_string(),
                ));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(RagError::Validation(format!(
                    "Duplicate FAQ id: {}",
                    entry.id
                )));
            }
        }

        let existing = self.index.count().await?;
        if existing > 0 {
            if !overwrite {
                return Err(RagError::Validation(format!(
                    "Collection already contains {existing} documents; set overwrite to replace them"
                )));
            }
            self.index.reset().await?;
        }

        let ids = entries.iter().map(|e| e.id.clone()).collect();
        let documents = entries.iter().map(|e| e.document_text()).collect();
        let metadatas = entries
            .iter()
            .map(|e| DocumentMeta::from_entry(e, SOURCE_TAG))
            .collect();

        self.index.add(ids, documents, metadatas).await?;

        tracing::info!(count = entries.len(), "FAQs ingested");
        Ok(entries.len())
    }

    /// Load FAQ entries from a JSON file and ingest them.
    pub async fn load_faqs_from_file(
        &self,
        path: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<usize, RagError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let entries: Vec<FaqEntry> = serde_json::from_str(&raw)?;
        self.ingest(&entries, overwrite).await
    }

    /// Search the knowledge base for documents relevant to `query`.
    ///
    /// Never fails: store errors are logged and an empty result is returned.
    pub async fn search(&self, query: &str, top_k: usize) -> SearchResult {
        match self.index.query(query, top_k).await {
            Ok(rows) => SearchResult {
                hits: rows
                    .into_iter()
                    .map(|(id, meta, distance)| SearchHit { id, meta, distance })
                    .collect(),
            },
            Err(err) => {
                tracing::warn!(error = %err, "Knowledge base search failed, continuing without context");
                SearchResult::empty()
            }
        }
    }

    /// Format search results into a grounding block for the LLM.
    pub fn format_context(&self, results: &SearchResult) -> String {
        if results.is_empty() {
            return EMPTY_CONTEXT.to_string();
        }

        let mut parts = vec!["Here is relevant information from the knowledge base:\n".to_string()];

        for (i, hit) in results.hits.iter().enumerate() {
            parts.push(format!(
                "\n[Source {} - Relevance: {:.2}]",
                i + 1,
                hit.relevance()
            ));
            parts.push(format!("Category: {}", hit.meta.category));
            parts.push(format!("Q: {}", hit.meta.question));
            parts.push(format!("A: {}", hit.meta.answer));
        }

        parts.join("\n")
    }

    /// Document count and per-category histogram.
    pub async fn stats(&self) -> Result<KnowledgeStats, RagError> {
        let total_documents = self.index.count().await?;

        let mut categories: HashMap<String, usize> = HashMap::new();
        if total_documents > 0 {
            for (_, meta) in self.index.all().await? {
                let category = if meta.category.is_empty() {
                    "unknown".to_string()
                } else {
                    meta.category
                };
                *categories.entry(category).or_insert(0) += 1;
            }
        }

        Ok(KnowledgeStats {
            total_documents,
            categories,
        })
    }

    /// Delete and recreate the underlying collection.
    pub async fn reset(&self) -> Result<(), RagError> {
        self.index.reset().await
    }
}
