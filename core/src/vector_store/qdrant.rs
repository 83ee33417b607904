use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use super::{ScoredContent, VectorStore, VectorStoreError};
use crate::config::VectorStoreConfig;
use crate::document::PointPayload;
use crate::embeddings::EMBEDDING_DIMENSIONS;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DISTANCE: &str = "Cosine";

/// A [Qdrant](https://qdrant.tech) collection accessed over its REST API.
///
/// Every operation is a single HTTP call against `<url>/collections/<collection_name>`.
/// The client is read-only after construction and can be shared between callers.
#[derive(Debug, Clone)]
pub struct QdrantVectorStore {
    client: Client,
    base_url: String,
    collection_name: String,
}

impl QdrantVectorStore {
    /// # Errors
    /// [`VectorStoreError::StoreUnavailable`] if the HTTP client can't be built.
    pub fn new(config: &VectorStoreConfig) -> Result<Self, VectorStoreError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| VectorStoreError::StoreUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            collection_name: config.collection_name.clone(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection_name)
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn ensure_collection(&self) -> Result<(), VectorStoreError> {
        use VectorStoreError::StoreUnavailable;
        let response = self
            .client
            .put(self.collection_url())
            .json(&json!({
                "vectors": { "size": EMBEDDING_DIMENSIONS, "distance": DISTANCE }
            }))
            .send()
            .await
            .map_err(|e| StoreUnavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                info!(url = %self.base_url, "Created collection");
                Ok(())
            }
            StatusCode::CONFLICT => {
                debug!("Collection already exists");
                Ok(())
            }
            _ => Err(StoreUnavailable(format!(
                "Failed to create collection: {}",
                response_body(response).await
            ))),
        }
    }

    #[instrument(skip(self, vector, content), fields(collection = %self.collection_name))]
    async fn upsert(
        &self,
        document_id: &str,
        vector: &[f32],
        content: &str,
    ) -> Result<(), VectorStoreError> {
        use VectorStoreError::StoreWriteFailure;
        info!(
            document_id,
            size = vector.len(),
            content_length = content.len(),
            "Saving embedding to Qdrant"
        );

        let point = QdrantPoint {
            id: Uuid::new_v4().to_string(),
            vector,
            payload: PointPayload::now(document_id, content),
        };
        let response = self
            .client
            .put(format!("{}/points", self.collection_url()))
            .json(&json!({ "points": [point] }))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to save embedding to Qdrant");
                StoreWriteFailure(e.to_string())
            })?;

        if response.status() == StatusCode::OK {
            info!(document_id, "Successfully saved embedding to Qdrant");
            Ok(())
        } else {
            let body = response_body(response).await;
            error!(error = %body, "Qdrant upsert failed");
            Err(StoreWriteFailure(format!("Qdrant upsert failed: {body}")))
        }
    }

    #[instrument(skip(self, query), fields(collection = %self.collection_name))]
    async fn try_search(
        &self,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredContent>, VectorStoreError> {
        use VectorStoreError::StoreUnavailable;
        info!("Querying similar embeddings from Qdrant");

        let response = self
            .client
            .post(format!("{}/points/search", self.collection_url()))
            .json(&json!({
                "vector": query,
                "limit": limit,
                "with_payload": true,
            }))
            .send()
            .await
            .map_err(|e| StoreUnavailable(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(StoreUnavailable(format!(
                "Qdrant search failed: {}",
                response_body(response).await
            )));
        }

        let res: QdrantSearchResponse = response
            .json()
            .await
            .map_err(|e| StoreUnavailable(format!("Malformed search response: {e}")))?;
        let hits: Vec<ScoredContent> = res.result.into_iter().map(Into::into).collect();

        info!(count = hits.len(), "Found similar documents from Qdrant");
        Ok(hits)
    }

    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn find_vector(&self, document_id: &str) -> Result<Option<Vec<f32>>, VectorStoreError> {
        use VectorStoreError::StoreUnavailable;
        let response = self
            .client
            .post(format!("{}/points/scroll", self.collection_url()))
            .json(&json!({
                "filter": { "must": [{ "key": "document_id", "match": { "value": document_id } }] },
                "limit": 1,
                "with_payload": false,
                "with_vector": true,
            }))
            .send()
            .await
            .map_err(|e| StoreUnavailable(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(StoreUnavailable(format!(
                "Qdrant scroll failed: {}",
                response_body(response).await
            )));
        }

        let res: QdrantScrollResponse = response
            .json()
            .await
            .map_err(|e| StoreUnavailable(format!("Malformed scroll response: {e}")))?;
        Ok(res.result.points.into_iter().next().and_then(|p| p.vector))
    }
}

async fn response_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error (failed to read response body)".to_string())
}

// Qdrant API data structures
#[derive(Debug, Serialize)]
struct QdrantPoint<'a> {
    id: String,
    vector: &'a [f32],
    payload: PointPayload,
}

#[derive(Debug, Deserialize)]
struct QdrantSearchResponse {
    #[serde(default)]
    result: Vec<QdrantScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct QdrantScoredPoint {
    #[serde(default)]
    score: f64,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QdrantScrollResponse {
    result: QdrantScrollResult,
}

#[derive(Debug, Deserialize)]
struct QdrantScrollResult {
    #[serde(default)]
    points: Vec<QdrantRecord>,
}

#[derive(Debug, Deserialize)]
struct QdrantRecord {
    #[serde(default)]
    vector: Option<Vec<f32>>,
}

impl From<QdrantScoredPoint> for ScoredContent {
    fn from(point: QdrantScoredPoint) -> Self {
        let content = point
            .payload
            .as_ref()
            .and_then(|p| p.get("content"))
            .map(content_text)
            .unwrap_or_default();
        Self {
            content,
            score: point.score,
        }
    }
}

// scalars render as their text, containers as nothing
fn content_text(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}
