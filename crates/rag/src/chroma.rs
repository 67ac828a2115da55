//! Chroma HTTP store implementation

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::store::VectorIndex;
use crate::types::DocumentMeta;
use crate::RagError;

/// Chroma connection configuration
#[derive(Debug, Clone)]
pub struct ChromaConfig {
    pub base_url: String,
    pub collection: String,
    pub timeout_seconds: u64,
}

impl Default for ChromaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            collection: "knowledge_base".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Vector index backed by the Chroma HTTP API
pub struct ChromaStore {
    client: Client,
    config: ChromaConfig,
    // Chroma addresses collections by id, which changes on reset
    collection_id: Mutex<String>,
}

impl ChromaStore {
    /// Connect to Chroma and get or create the configured collection
    pub async fn connect(config: ChromaConfig) -> Result<Self, RagError> {
        tracing::info!(url = %config.base_url, collection = %config.collection, "Connecting to Chroma");

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|err| RagError::Connection(err.to_string()))?;

        let collection_id = Self::get_or_create_collection(&client, &config).await?;

        Ok(Self {
            client,
            config,
            collection_id: Mutex::new(collection_id),
        })
    }

    async fn get_or_create_collection(
        client: &Client,
        config: &ChromaConfig,
    ) -> Result<String, RagError> {
        let url = format!("{}/api/v1/collections", config.base_url);
        let body = CreateCollectionRequest {
            name: config.collection.clone(),
            get_or_create: true,
        };

        let response = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let response = check_status(response).await?;
        let collection: CollectionResponse = response
            .json()
            .await
            .map_err(|err| RagError::Store(format!("Failed to parse collection response: {err}")))?;

        Ok(collection.id)
    }

    fn collection_url(&self, suffix: &str) -> String {
        let id = self.collection_id.lock().clone();
        format!("{}/api/v1/collections/{}/{}", self.config.base_url, id, suffix)
    }
}

#[async_trait]
impl VectorIndex for ChromaStore {
    async fn add(
        &self,
        ids: Vec<String>,
        documents: Vec<String>,
        metadatas: Vec<DocumentMeta>,
    ) -> Result<(), RagError> {
        let url = self.collection_url("add");
        let body = AddRequest {
            ids,
            documents,
            metadatas,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;
        check_status(response).await?;

        Ok(())
    }

    async fn query(
        &self,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<(String, DocumentMeta, f32)>, RagError> {
        let url = self.collection_url("query");
        let body = QueryRequest {
            query_texts: vec![text.to_string()],
            n_results: top_k,
            include: vec!["metadatas".to_string(), "distances".to_string()],
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;
        let response = check_status(response).await?;

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|err| RagError::Store(format!("Failed to parse query response: {err}")))?;

        let ids = parsed.ids.into_iter().next().unwrap_or_default();
        let metas = parsed
            .metadatas
            .and_then(|m| m.into_iter().next())
            .unwrap_or_default();
        let distances = parsed
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();

        Ok(ids
            .into_iter()
            .zip(metas)
            .zip(distances)
            .map(|((id, meta), distance)| (id, meta, distance))
            .collect())
    }

    async fn count(&self) -> Result<usize, RagError> {
        let url = self.collection_url("count");

        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        let response = check_status(response).await?;

        response
            .json::<usize>()
            .await
            .map_err(|err| RagError::Store(format!("Failed to parse count response: {err}")))
    }

    async fn all(&self) -> Result<Vec<(String, DocumentMeta)>, RagError> {
        let url = self.collection_url("get");
        let body = GetRequest {
            include: vec!["metadatas".to_string()],
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;
        let response = check_status(response).await?;

        let parsed: GetResponse = response
            .json()
            .await
            .map_err(|err| RagError::Store(format!("Failed to parse get response: {err}")))?;

        let metas = parsed.metadatas.unwrap_or_default();
        Ok(parsed.ids.into_iter().zip(metas).collect())
    }

    async fn reset(&self) -> Result<(), RagError> {
        let url = format!(
            "{}/api/v1/collections/{}",
            self.config.base_url, self.config.collection
        );

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(map_send_error)?;
        // A missing collection is fine, the goal is an empty one
        if response.status() != StatusCode::NOT_FOUND {
            check_status(response).await?;
        }

        let new_id = Self::get_or_create_collection(&self.client, &self.config).await?;
        *self.collection_id.lock() = new_id;

        tracing::info!(collection = %self.config.collection, "Collection reset");
        Ok(())
    }
}

fn map_send_error(err: reqwest::Error) -> RagError {
    if err.is_connect() || err.is_timeout() {
        RagError::Connection(err.to_string())
    } else {
        RagError::Store(err.to_string())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RagError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    Err(RagError::Store(format!("Chroma returned {status}: {body}")))
}

#[derive(Serialize)]
struct CreateCollectionRequest {
    name: String,
    get_or_create: bool,
}

#[derive(Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Serialize)]
struct AddRequest {
    ids: Vec<String>,
    documents: Vec<String>,
    metadatas: Vec<DocumentMeta>,
}

#[derive(Serialize)]
struct QueryRequest {
    query_texts: Vec<String>,
    n_results: usize,
    include: Vec<String>,
}

#[derive(Deserialize)]
struct QueryResponse {
    ids: Vec<Vec<String>>,
    metadatas: Option<Vec<Vec<DocumentMeta>>>,
    distances: Option<Vec<Vec<f32>>>,
}

#[derive(Serialize)]
struct GetRequest {
    include: Vec<String>,
}

#[derive(Deserialize)]
struct GetResponse {
    ids: Vec<String>,
    metadatas: Option<Vec<DocumentMeta>>,
}
