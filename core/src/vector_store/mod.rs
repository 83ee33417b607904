pub mod qdrant;

pub use qdrant::QdrantVectorStore;

use async_trait::async_trait;
use chrono::Utc;
use std::fmt;
use thiserror::Error;
use tracing::{error, info, warn};

/// Number of neighbours retrieved for every chat query.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Context served in place of search results when the store can't be queried.
pub const FALLBACK_RESULTS: [&str; 3] = [
    "Error retrieving from Qdrant. Using fallback content.",
    "Cloud computing provides scalability and cost efficiency.",
    "Modern applications benefit from microservices architecture.",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VectorStoreError {
    #[error("Vector store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Failed to write to vector store: {0}")]
    StoreWriteFailure(String),
}

/// Stored content paired with its similarity to the query vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredContent {
    pub content: String,
    pub score: f64,
}

impl fmt::Display for ScoredContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (similarity: {:.3})", self.content, self.score)
    }
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Creates the collection, treating "already exists" as success.
    async fn ensure_collection(&self) -> Result<(), VectorStoreError>;

    /// Stores one vector with its document id, content and the current time.
    async fn upsert(
        &self,
        document_id: &str,
        vector: &[f32],
        content: &str,
    ) -> Result<(), VectorStoreError>;

    /// Returns up to `limit` stored contents ranked by similarity to `query`.
    async fn try_search(
        &self,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredContent>, VectorStoreError>;

    /// Returns the vector stored for `document_id`, if any.
    async fn find_vector(&self, document_id: &str) -> Result<Option<Vec<f32>>, VectorStoreError>;

    /// Startup hook: runs [`ensure_collection`](VectorStore::ensure_collection) and
    /// only logs a failure, leaving the store usable if the collection already exists.
    async fn initialize_collection(&self) {
        match self.ensure_collection().await {
            Ok(()) => info!("Vector store collection initialized"),
            Err(e) => warn!(error = %e, "Failed to initialize vector store collection"),
        }
    }

    /// Searches for similar contents, formatted as `"<content> (similarity: <score>)"`.
    ///
    /// Never fails: if the store can't be queried the error is logged with
    /// `fallback = true` and [`FALLBACK_RESULTS`] are returned instead. Use
    /// [`try_search`](VectorStore::try_search) to observe the failure.
    async fn search(&self, query: &[f32], limit: usize) -> Vec<String> {
        match self.try_search(query, limit).await {
            Ok(hits) => hits.iter().map(ToString::to_string).collect(),
            Err(e) => {
                error!(error = %e, fallback = true, "Vector store search failed, serving fallback context");
                FALLBACK_RESULTS.iter().map(|s| (*s).to_string()).collect()
            }
        }
    }

    /// Stores a vector without real content, recording a placeholder for it.
    async fn save_embedding(&self, document_id: &str, vector: &[f32]) -> Result<(), VectorStoreError> {
        let content = format!("Document content for ID: {document_id}");
        self.upsert(document_id, vector, &content).await
    }

    /// Stores a bare vector under a generated `embedding_<unix millis>` id, returning the id.
    async fn store_embedding(&self, vector: &[f32]) -> Result<String, VectorStoreError> {
        let document_id = format!("embedding_{}", Utc::now().timestamp_millis());
        self.save_embedding(&document_id, vector).await?;
        Ok(document_id)
    }
}
