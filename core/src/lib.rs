//! # ragchat - Core API Documentation
//!
//! ragchat is a small retrieval-augmented chat layer: documents are turned into
//! text, embedded, and stored in a [Qdrant](https://qdrant.tech) collection; queries
//! are embedded, matched against that collection, and sent to a chat model together
//! with the retrieved context.
//!
//! ## Components
//!
//! - **Extractor**: plain text, PDF and DOCX uploads to a single text string
//! - **Embedder**: validated access to an external embedding model
//! - **Vector Store**: create-collection, upsert and search over Qdrant's REST API
//! - **Completion models**: chat model providers behind a single trait
//! - **ChatService**: the orchestrator tying the pieces together
//!
//! ## Example
//!
//! ```rust,no_run
//! use ragchat::{chat::ChatService, config::RagConfig, extract::UploadedFile};
//!
//! #[tokio::main]
//! async fn main() -> ragchat::error::Result<()> {
//!     let config = RagConfig::new("http://localhost:6333", "documents");
//!     // creates the collection if needed, failures are logged and ignored
//!     let service = ChatService::from_config(&config).await?;
//!
//!     service.index_text("The sky is blue.").await?;
//!     service
//!         .index_file(&UploadedFile::new("notes.txt", b"Grass is green.".to_vec()))
//!         .await?;
//!
//!     let answer = service.query_and_chat("What color is the sky?").await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature flags
//!
//! Name | Description | Default?
//! ---|---|---
//! `pdf` | enables text extraction from PDF uploads | Yes
//! `docx` | enables text extraction from DOCX uploads | Yes

/// Retrieval-augmented chat orchestration
pub mod chat;

/// Chat model abstractions
///
/// Contains:
/// - the `CompletionModel` trait implemented by providers
/// - the `Message` and `TokenUsage` types exchanged with them
pub mod completion;

/// Explicit configuration passed to every client
pub mod config;

/// Documents and the payload persisted alongside their vectors
pub mod document;

/// Text embeddings support
pub mod embeddings;

/// Error types for all library operations
pub mod error;

/// Text extraction from uploaded files
pub mod extract;

/// Builtin completion and embedding model providers
pub mod providers;

/// Vector storage and retrieval
pub mod vector_store;
