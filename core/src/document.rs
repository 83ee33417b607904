use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Prefix of identifiers generated for indexed documents.
pub const DOCUMENT_ID_PREFIX: &str = "doc_";

/// Text content about to be indexed, identified by its ingestion time.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: String,
}

impl Document {
    /// Creates a document with an id of the form `doc_<unix millis>`.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            id: format!("{DOCUMENT_ID_PREFIX}{}", Utc::now().timestamp_millis()),
            data: data.into(),
        }
    }
}

/// Metadata persisted next to every vector in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointPayload {
    pub document_id: String,
    pub content: String,
    /// Ingestion time in unix milliseconds.
    pub timestamp: i64,
}

impl PointPayload {
    /// Payload stamped with the current time.
    pub fn now(document_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            content: content.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
