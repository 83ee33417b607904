use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by an embedding provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("RequestError: {0}")]
    RequestError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
    #[error("Provider error -> HTTP Status {0}: {1}")]
    ProviderError(u16, String),
}

/// An external model turning text into a fixed-length vector.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    async fn embed(&self, data: &str) -> Result<Vec<f32>, ModelError>;
}
