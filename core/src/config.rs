//! Configuration for the vector store, the embedding model and the chat model.
//!
//! The configuration is an ordinary value built once at startup and handed to each
//! client's constructor. It is usually read from JSON:
//!
//! ```json
//! {
//!     "vector_store": { "url": "http://localhost:6333", "collection_name": "documents" },
//!     "embedding": { "model": "text-embedding-3-small", "dimensions": 384 },
//!     "completion": { "model": "gpt-4o-mini", "api_key_var": "MY_OPENAI_KEY" },
//!     "preamble": "You are a helpful AI assistant for document queries."
//! }
//! ```
//!
//! Only `vector_store` is required. Provider sections fall back to the provider's
//! defaults for every field left out.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// System preamble sent with every chat request unless configured otherwise.
pub const DEFAULT_PREAMBLE: &str = "You are a helpful AI assistant for document queries.";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(String),
    #[error("Failed to deserialize json config: {0}")]
    Parse(String),
    #[error("Missing required config value `{0}`")]
    Missing(&'static str),
    #[error("Failed to fetch env var `{0}`")]
    MissingApiKey(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RagConfig {
    pub vector_store: VectorStoreConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default = "default_preamble")]
    pub preamble: String,
}

/// Where the Qdrant collection lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VectorStoreConfig {
    pub url: String,
    pub collection_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    pub api_url: Option<String>,
    /// Name of the environment variable holding the API key.
    pub api_key_var: Option<String>,
    pub model: Option<String>,
    pub dimensions: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionConfig {
    pub api_url: Option<String>,
    /// Name of the environment variable holding the API key.
    pub api_key_var: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<usize>,
}

fn default_preamble() -> String {
    DEFAULT_PREAMBLE.to_string()
}

impl RagConfig {
    /// Config for the given Qdrant endpoint and collection, provider defaults elsewhere.
    pub fn new(url: impl Into<String>, collection_name: impl Into<String>) -> Self {
        Self {
            vector_store: VectorStoreConfig {
                url: url.into(),
                collection_name: collection_name.into(),
            },
            embedding: EmbeddingConfig::default(),
            completion: CompletionConfig::default(),
            preamble: default_preamble(),
        }
    }

    /// Parses and validates a JSON config.
    ///
    /// # Errors
    /// - [`ConfigError::Parse`] on malformed JSON or unknown fields
    /// - [`ConfigError::Missing`] if the store url or collection name is blank
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Read(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vector_store.url.trim().is_empty() {
            return Err(ConfigError::Missing("vector_store.url"));
        }
        if self.vector_store.collection_name.trim().is_empty() {
            return Err(ConfigError::Missing("vector_store.collection_name"));
        }
        Ok(())
    }
}

/// Reads the API key from the named environment variable.
pub(crate) fn api_key_from_env(var: &str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingApiKey(var.to_string()))
}
