//! Knowledge base data types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single FAQ entry as found in the FAQ file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
}

impl FaqEntry {
    /// Text indexed for semantic search. Question and answer are combined
    /// so that matches on either side rank the document.
    pub fn document_text(&self) -> String {
        format!("Question: {}\nAnswer: {}", self.question, self.answer)
    }
}

/// Metadata stored alongside each indexed document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub source: String,
}

impl DocumentMeta {
    pub fn from_entry(entry: &FaqEntry, source: &str) -> Self {
        Self {
            question: entry.question.clone(),
            answer: entry.answer.clone(),
            category: entry.category.clone(),
            source: source.to_string(),
        }
    }
}

/// A single search hit, ordered by ascending distance
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub meta: DocumentMeta,
    pub distance: f32,
}

impl SearchHit {
    /// Relevance score derived from the store distance. Distances above 1.0
    /// are possible for cosine metrics, so the score is clamped to [0, 1].
    pub fn relevance(&self) -> f32 {
        (1.0 - self.distance).clamp(0.0, 1.0)
    }
}

/// Ordered search results, closest first
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub hits: Vec<SearchHit>,
}

impl SearchResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Knowledge base statistics
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeStats {
    pub total_documents: usize,
    pub categories: HashMap<String, usize>,
}
