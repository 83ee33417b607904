use async_trait::async_trait;
use thiserror::Error;

pub const DEFAULT_TEMPERATURE: f64 = 1.0;
pub const DEFAULT_MAX_TOKENS: usize = 2400;

/// Message that'll be sent in Completions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// System prompt
    Preamble(String),
    /// Message sent by the user
    User(String),
    /// Response from the assistant
    Assistant(String),
}

impl Message {
    pub fn content(&self) -> &str {
        match self {
            Self::Preamble(c) | Self::User(c) | Self::Assistant(c) => c,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Provider error -> HTTP Status {0}: {1}")]
    ProviderError(u16, String),
    #[error("RequestError: {0}")]
    RequestError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
}

/// A chat model taking a message list and answering with a single assistant message.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Send the messages to the LLM and get a reply
    async fn send(
        &self,
        messages: &[Message],
        temperature: f64,
        max_tokens: usize,
    ) -> Result<(Message, TokenUsage), CompletionError>;
}
