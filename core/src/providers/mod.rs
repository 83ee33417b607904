/// Chat completion providers
pub mod completions;

/// Embedding providers
pub mod embeddings;
