use async_trait::async_trait;
use companion_chat_core::Companion;

use crate::error::StorageError;

/// Persona catalogue operations.
#[async_trait]
pub trait CompanionStore: Send + Sync {
    /// Insert or replace a companion by id.
    async fn upsert_companion(&self, companion: &Companion) -> Result<(), StorageError>;

    /// Get companion by id.
    async fn get_companion(&self, id: &str) -> Result<Option<Companion>, StorageError>;

    /// All companions ordered by name.
    async fn list_companions(&self) -> Result<Vec<Companion>, StorageError>;
}
