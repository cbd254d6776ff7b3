use async_trait::async_trait;
use companion_chat_core::{Message, MessageRole};

use crate::error::StorageError;

/// Append-only message log.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message stamped with the current time.
    async fn append_message(
        &self,
        conversation_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<Message, StorageError>;

    /// Every message of a conversation, oldest first.
    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>, StorageError>;

    /// The `limit` newest messages of a conversation, returned oldest first.
    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, StorageError>;
}
