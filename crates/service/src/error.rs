//! Typed error enum for the service layer.
//!
//! Unifies storage, model, embedding and vector failures so handlers can
//! match on the failure mode instead of downcasting.

use companion_chat_embeddings::EmbeddingError;
use companion_chat_llm::LlmError;
use companion_chat_storage::StorageError;
use companion_chat_vector::IndexError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    #[error("embedding: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector index: {0}")]
    Index(#[from] IndexError),

    /// Caller provided invalid input (empty text, out-of-range `topK`).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Storage(StorageError::NotFound { .. }))
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Trimmed `value`, or `InvalidInput` naming `field` when it is blank.
pub(crate) fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::invalid(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}
