use crate::config::{api_key_from_env, ConfigError, EmbeddingConfig};
use crate::embeddings::{
    model::{EmbeddingModel, ModelError},
    EMBEDDING_DIMENSIONS,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, instrument};

const API_KEY_ENV_VAR: &str = "RAGCHAT_OPENAI_API_KEY";
const URL: &str = "https://api.openai.com/v1/embeddings";
const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Embedding model speaking the OpenAI embeddings protocol.
///
/// The requested output size defaults to [`EMBEDDING_DIMENSIONS`] so vectors fit the
/// collection created by the vector store.
pub struct OpenAIEmbeddingModel {
    api_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
    client: Client,
}

impl OpenAIEmbeddingModel {
    /// Builds the model from config, reading the API key from the configured
    /// environment variable (`RAGCHAT_OPENAI_API_KEY` by default).
    pub fn new(config: &EmbeddingConfig) -> Result<Self, ConfigError> {
        let api_key_var = config.api_key_var.as_deref().unwrap_or(API_KEY_ENV_VAR);
        let api_key = api_key_from_env(api_key_var).inspect_err(|e| error!(%e))?;
        Ok(Self::with_api_key(
            api_key,
            config.api_url.clone().unwrap_or(URL.to_string()),
            config.model.clone().unwrap_or(DEFAULT_MODEL.to_string()),
            config.dimensions.unwrap_or(EMBEDDING_DIMENSIONS),
        ))
    }

    #[must_use]
    pub fn with_api_key(api_key: String, api_url: String, model: String, dimensions: usize) -> Self {
        Self {
            api_url,
            api_key,
            model,
            dimensions,
            client: Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct OpenAIEmbeddingResponse {
    pub data: Vec<OpenAIEmbeddingData>,
}

#[derive(Deserialize)]
struct OpenAIEmbeddingData {
    pub embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingModel for OpenAIEmbeddingModel {
    #[instrument(skip(self, data), fields(text_len = data.len(), model = %self.model))]
    async fn embed(&self, data: &str) -> Result<Vec<f32>, ModelError> {
        let request_body = json!({
                "input": data,
                "model": self.model,
                "dimensions": self.dimensions,
        });
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ModelError::RequestError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let response = response
                .json::<OpenAIEmbeddingResponse>()
                .await
                .map_err(|e| ModelError::ParseError(e.to_string()))?;

            Ok(response
                .data
                .into_iter()
                .flat_map(|d| d.embedding)
                .collect())
        } else {
            let error_message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            Err(ModelError::ProviderError(status.as_u16(), error_message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn model_for(server: &mockito::Server) -> OpenAIEmbeddingModel {
        OpenAIEmbeddingModel::with_api_key(
            "test-key".to_string(),
            format!("{}/v1/embeddings", server.url()),
            DEFAULT_MODEL.to_string(),
            EMBEDDING_DIMENSIONS,
        )
    }

    #[tokio::test]
    async fn test_embed_request_and_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/embeddings")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::Json(json!({
                "input": "hello",
                "model": DEFAULT_MODEL,
                "dimensions": 384
            })))
            .with_status(200)
            .with_body(json!({"data": [{"embedding": vec![0.25f32; 384]}]}).to_string())
            .create_async()
            .await;

        let embedding = model_for(&server).embed("hello").await.unwrap();

        mock.assert_async().await;
        assert_eq!(embedding.len(), EMBEDDING_DIMENSIONS);
        assert!(embedding.iter().all(|&v| v == 0.25));
    }

    #[tokio::test]
    async fn test_provider_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/embeddings")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let result = model_for(&server).embed("hello").await;
        assert_eq!(
            result,
            Err(ModelError::ProviderError(500, "internal error".to_string()))
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/embeddings")
            .with_status(200)
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;

        let result = model_for(&server).embed("hello").await;
        assert!(matches!(result, Err(ModelError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let model = OpenAIEmbeddingModel::with_api_key(
            "test-key".to_string(),
            "http://127.0.0.1:1/v1/embeddings".to_string(),
            DEFAULT_MODEL.to_string(),
            EMBEDDING_DIMENSIONS,
        );
        let result = model.embed("hello").await;
        assert!(matches!(result, Err(ModelError::RequestError(_))));
    }

    #[tokio::test]
    #[ignore]
    async fn simple_openai_embed_request() {
        let model = OpenAIEmbeddingModel::new(&EmbeddingConfig::default()).unwrap();
        let response = model.embed("test").await;
        assert!(response.is_ok_and(|v| v.len() == EMBEDDING_DIMENSIONS));
    }
}
