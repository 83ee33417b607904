use crate::{
    completion::CompletionError, config::ConfigError, embeddings::EmbedderError,
    extract::ExtractError, vector_store::VectorStoreError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),
    #[error("Embedder error: {0}")]
    Embedder(#[from] EmbedderError),
    #[error("VectorStore error: {0}")]
    VectorStore(#[from] VectorStoreError),
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::model::ModelError;

    #[test]
    fn test_from_module_errors() {
        let err: Error = ExtractError::UnsupportedFormat("rtf".to_string()).into();
        assert!(matches!(err, Error::Extract(ExtractError::UnsupportedFormat(_))));
        assert!(err.to_string().contains("rtf"));

        let err: Error = VectorStoreError::StoreWriteFailure("boom".to_string()).into();
        assert!(matches!(err, Error::VectorStore(VectorStoreError::StoreWriteFailure(_))));

        let err: Error =
            EmbedderError::Failure(ModelError::RequestError("timed out".to_string())).into();
        assert!(matches!(err, Error::Embedder(EmbedderError::Failure(_))));
    }

    #[test]
    fn test_embedding_failure_keeps_cause() {
        use std::error::Error as _;
        let err = EmbedderError::Failure(ModelError::ProviderError(500, "down".to_string()));
        let source = err.source().expect("failure carries its cause");
        assert!(source.to_string().contains("down"));
    }
}
