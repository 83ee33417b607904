//! Indexes a few documents into a local Qdrant and asks a question about them.
//!
//! ```sh
//! docker run -p 6333:6333 qdrant/qdrant
//! RAGCHAT_OPENAI_API_KEY=sk-... cargo run --example index_and_query -- [config.json] [files...]
//! ```

use ragchat::{chat::ChatService, config::RagConfig, extract::UploadedFile};
use std::error::Error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ragchat=info")),
        )
        .init();

    let mut args = std::env::args().skip(1).peekable();
    let config = match args.next_if(|arg| arg.ends_with(".json")) {
        Some(path) => RagConfig::from_file(path)?,
        None => RagConfig::new("http://localhost:6333", "documents"),
    };
    let service = ChatService::from_config(&config).await?;

    service.index_text("The sky is blue.").await?;
    service
        .index_file(&UploadedFile::new("grass.txt", b"Grass is green.".to_vec()))
        .await?;
    for path in args {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| format!("Failed to read {path}: {e}"))?;
        service.index_file(&UploadedFile::new(path, bytes)).await?;
    }

    let answer = service.query_and_chat("What color is the sky?").await?;
    println!("{answer}");
    Ok(())
}
