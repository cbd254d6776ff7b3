//! Embedding generation for semantic memory
//!
//! Text is embedded by an external OpenAI-compatible `/v1/embeddings`
//! endpoint; nothing is computed locally.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod client;
pub mod error;

use async_trait::async_trait;

pub use client::{DEFAULT_EMBEDDING_MODEL, OpenAiEmbeddings};
pub use error::EmbeddingError;

/// Anything that turns text into vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts. Output order matches input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embed one text.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed(&[text.to_owned()]).await?.into_iter().next().ok_or(EmbeddingError::EmptyResult)
    }
}
