use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::{
    completion::{CompletionModel, Message, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE},
    config::{RagConfig, DEFAULT_PREAMBLE},
    document::Document,
    embeddings::Embedder,
    error::Result,
    extract::{self, UploadedFile},
    providers::{completions::OpenAI, embeddings::OpenAIEmbedding},
    vector_store::{QdrantVectorStore, VectorStore, DEFAULT_SEARCH_LIMIT},
};

/// Ties extraction, embedding, storage and the chat model into the two
/// retrieval-augmented flows: indexing a document and answering a query.
///
/// Every call is independent. Nothing is kept between calls apart from what the
/// vector store persists, so a single service can be shared freely.
pub struct ChatService {
    embedder: Embedder,
    vector_store: Arc<dyn VectorStore>,
    completion_model: Arc<dyn CompletionModel>,

    // common prompt parameters
    preamble: String,
    temperature: f64,
    max_tokens: usize,
}

impl ChatService {
    pub fn new(
        embedder: Embedder,
        vector_store: impl VectorStore + 'static,
        completion_model: impl CompletionModel + 'static,
    ) -> Self {
        Self::from_parts(embedder, Arc::new(vector_store), Arc::new(completion_model))
    }

    pub fn from_parts(
        embedder: Embedder,
        vector_store: Arc<dyn VectorStore>,
        completion_model: Arc<dyn CompletionModel>,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            completion_model,
            preamble: DEFAULT_PREAMBLE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Builds the OpenAI-backed providers and the Qdrant store described by `config`,
    /// then initializes the collection.
    ///
    /// A failure to create the collection is logged and ignored; a missing API key
    /// or an unusable store URL is returned as an error.
    pub async fn from_config(config: &RagConfig) -> Result<Self> {
        config.validate()?;
        let embedder = Embedder::new(OpenAIEmbedding::new(&config.embedding)?);
        let completion_model = OpenAI::new(&config.completion)?;
        let vector_store = QdrantVectorStore::new(&config.vector_store)?;
        vector_store.initialize_collection().await;

        Ok(Self::new(embedder, vector_store, completion_model)
            .with_preamble(&config.preamble)
            .with_temperature(config.completion.temperature.unwrap_or(DEFAULT_TEMPERATURE))
            .with_max_tokens(config.completion.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)))
    }

    /// System prompt sent ahead of every query
    #[must_use]
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// The store backing this service, for direct vector lookups and writes.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Embeds `text` and stores it under a fresh `doc_<unix millis>` id.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn index_text(&self, text: &str) -> Result<()> {
        let vector = self.embedder.embed(text).await?;
        let document = Document::new(text);
        self.vector_store
            .upsert(&document.id, &vector, &document.data)
            .await?;
        info!(document_id = %document.id, "Indexed document");
        Ok(())
    }

    /// Extracts the text of an upload and indexes it like [`index_text`](Self::index_text).
    #[instrument(skip(self, file), fields(filename = ?file.filename))]
    pub async fn index_file(&self, file: &UploadedFile) -> Result<()> {
        let text = extract::extract(file).await?;
        self.index_text(&text).await
    }

    /// Answers `query` using the closest stored documents as context.
    ///
    /// Search failures don't fail the query, the store's fallback context is used
    /// instead. Embedding and chat model failures are returned.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn query_and_chat(&self, query: &str) -> Result<String> {
        let vector = self.embedder.embed(query).await?;
        let results = self.vector_store.search(&vector, DEFAULT_SEARCH_LIMIT).await;
        let prompt = build_prompt(&results.join("\n"), query);
        debug!(context_entries = results.len(), "Built prompt");

        let messages = [Message::Preamble(self.preamble.clone()), Message::User(prompt)];
        let (reply, _usage) = self
            .completion_model
            .send(&messages, self.temperature, self.max_tokens)
            .await?;
        Ok(reply.content().to_string())
    }
}

fn build_prompt(context: &str, query: &str) -> String {
    format!("Context:\n{context}\n\nQuery:\n{query}")
}
