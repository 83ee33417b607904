pub mod model;

use model::{EmbeddingModel, ModelError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Dimensionality of the vectors this crate stores.
pub const EMBEDDING_DIMENSIONS: usize = 384;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmbedderError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to generate embedding")]
    Failure(#[source] ModelError),
}

/// Validating front for an [`EmbeddingModel`].
///
/// Rejects blank input before calling out, and reports every provider failure as
/// [`EmbedderError::Failure`] with the original cause attached. The length of the
/// returned vector is whatever the configured model produces.
#[derive(Clone)]
pub struct Embedder {
    model: Arc<dyn EmbeddingModel>,
}

impl Embedder {
    pub fn new(model: impl EmbeddingModel + 'static) -> Self {
        Self {
            model: Arc::new(model),
        }
    }

    pub fn from_arc(model: Arc<dyn EmbeddingModel>) -> Self {
        Self { model }
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        if text.trim().is_empty() {
            return Err(EmbedderError::InvalidArgument(
                "input text must not be blank".to_string(),
            ));
        }
        match self.model.embed(text).await {
            Ok(embedding) => {
                debug!(dimensions = embedding.len(), "Generated embedding");
                Ok(embedding)
            }
            Err(e) => {
                error!(error = %e, "Failed to generate embedding");
                Err(EmbedderError::Failure(e))
            }
        }
    }
}
