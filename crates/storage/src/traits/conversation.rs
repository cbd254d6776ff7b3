use async_trait::async_trait;
use companion_chat_core::{Conversation, NewConversation};

use crate::error::StorageError;

/// Conversation lifecycle operations.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Create a conversation with a fresh id and `created_at == updated_at == now`.
    async fn create_conversation(
        &self,
        input: NewConversation,
    ) -> Result<Conversation, StorageError>;

    /// Get a conversation only if it belongs to `user_id`.
    async fn find_conversation_for_user(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<Conversation>, StorageError>;

    /// Most recently updated conversation between a user and a companion.
    async fn latest_conversation(
        &self,
        user_id: &str,
        companion_id: &str,
    ) -> Result<Option<Conversation>, StorageError>;

    /// Bump `updated_at` to now.
    async fn touch_conversation(&self, id: &str) -> Result<(), StorageError>;
}
