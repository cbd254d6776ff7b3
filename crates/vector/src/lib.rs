//! Semantic memory index
//!
//! Snippets and their embeddings live in a hosted vector collection.
//! Nothing here ranks or indexes locally; the service does both.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod error;
mod payload;
mod qdrant;

use async_trait::async_trait;
use companion_chat_core::{MemoryEntry, MemoryFilter, MemoryHit};

pub use error::IndexError;
pub use qdrant::{DEFAULT_COLLECTION, QdrantConfig, QdrantIndex};

/// Payload key holding the snippet text next to its metadata.
pub const DOCUMENT_KEY: &str = "document";

/// Upsert-by-id and filtered nearest-neighbour query over memory snippets.
#[async_trait]
pub trait MemoryIndex: Send + Sync {
    /// Create the collection and its payload indexes if missing.
    async fn ensure_ready(&self) -> Result<(), IndexError>;

    /// Insert or replace entries by id.
    async fn upsert(&self, entries: Vec<MemoryEntry>) -> Result<(), IndexError>;

    /// Up to `top_k` nearest entries whose metadata satisfies `filter`,
    /// closest first.
    async fn query(
        &self,
        embedding: &[f32],
        filter: &MemoryFilter,
        top_k: u64,
    ) -> Result<Vec<MemoryHit>, IndexError>;
}
