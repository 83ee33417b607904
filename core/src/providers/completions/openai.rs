use crate::completion::{CompletionError, CompletionModel, Message, TokenUsage};
use crate::config::{api_key_from_env, CompletionConfig, ConfigError};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, instrument};

const API_KEY_ENV_VAR: &str = "RAGCHAT_OPENAI_API_KEY";
const URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Chat model speaking the OpenAI chat-completions protocol.
///
/// Any endpoint implementing the same protocol can be targeted through `api_url`.
pub struct OpenAICompletionModel {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
    model: String,
}

impl OpenAICompletionModel {
    /// Builds the model from config, reading the API key from the configured
    /// environment variable (`RAGCHAT_OPENAI_API_KEY` by default).
    ///
    /// # Errors
    /// [`ConfigError::MissingApiKey`] if the variable isn't set.
    pub fn new(config: &CompletionConfig) -> Result<Self, ConfigError> {
        let api_key_var = config.api_key_var.as_deref().unwrap_or(API_KEY_ENV_VAR);
        let api_key = api_key_from_env(api_key_var).inspect_err(|e| error!(%e))?;
        Ok(Self::with_api_key(
            api_key,
            config.api_url.clone().unwrap_or(URL.to_string()),
            config.model.clone().unwrap_or(DEFAULT_MODEL.to_string()),
        ))
    }

    #[must_use]
    pub fn with_api_key(api_key: String, api_url: String, model: String) -> Self {
        Self {
            api_key,
            api_url,
            client: reqwest::Client::new(),
            model,
        }
    }
}

#[derive(Serialize, Debug, Eq, PartialEq)]
#[serde(tag = "role", content = "content")]
#[allow(non_camel_case_types)]
enum OpenAIMessage {
    system(String),
    user(String),
    assistant(String),
}

impl From<&Message> for OpenAIMessage {
    fn from(value: &Message) -> OpenAIMessage {
        match value {
            Message::Preamble(s) => OpenAIMessage::system(s.clone()),
            Message::User(s) => OpenAIMessage::user(s.clone()),
            Message::Assistant(s) => OpenAIMessage::assistant(s.clone()),
        }
    }
}

#[async_trait]
impl CompletionModel for OpenAICompletionModel {
    #[instrument(skip(self, messages, temperature), fields(message_count = messages.len()))]
    async fn send(
        &self,
        messages: &[Message],
        temperature: f64,
        max_tokens: usize,
    ) -> Result<(Message, TokenUsage), CompletionError> {
        let messages: Vec<OpenAIMessage> = messages.iter().map(Into::into).collect();

        let request_body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        debug!(request_body = ?request_body, "Sending request to OpenAI");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Request failed");
                CompletionError::RequestError(e.to_string())
            })?;

        let status = response.status();
        debug!(%status, "Received API response");

        if !status.is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error (failed to read response body)".to_string());

            error!(
                status = %status,
                error = %error_msg,
                "API returned error response"
            );
            return Err(CompletionError::ProviderError(status.as_u16(), error_msg));
        }

        let response_json: serde_json::Value = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response JSON");
            CompletionError::ParseError(e.to_string())
        })?;

        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(CompletionError::ParseError(
                "Invalid response body".to_string(),
            ))?
            .to_string();

        let usage = &response_json["usage"];
        let token_usage = TokenUsage {
            prompt_tokens: usage["prompt_tokens"].as_u64(),
            completion_tokens: usage["completion_tokens"].as_u64(),
            total_tokens: usage["total_tokens"].as_u64(),
        };
        if token_usage.total_tokens.is_some() {
            info!(
                prompt_tokens = token_usage.prompt_tokens,
                completion_tokens = token_usage.completion_tokens,
                total_tokens = token_usage.total_tokens,
                "Token usage recorded"
            );
        }

        Ok((Message::Assistant(content), token_usage))
    }
}
