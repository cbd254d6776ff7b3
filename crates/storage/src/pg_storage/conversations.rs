//! ConversationStore implementation for PgStorage.

use super::*;

use crate::traits::ConversationStore;
use async_trait::async_trait;
use chrono::Utc;
use companion_chat_core::NewConversation;

#[async_trait]
impl ConversationStore for PgStorage {
    async fn create_conversation(
        &self,
        input: NewConversation,
    ) -> Result<Conversation, StorageError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let row = sqlx::query(&format!(
            "INSERT INTO conversations ({CONVERSATION_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$5)
             RETURNING {CONVERSATION_COLUMNS}"
        ))
        .bind(&id)
        .bind(&input.user_id)
        .bind(&input.companion_id)
        .bind(&input.title)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!(
            conversation_id = %id,
            companion_id = %input.companion_id,
            "conversation created"
        );
        row_to_conversation(&row)
    }

    async fn find_conversation_for_user(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<Conversation>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_conversation(&r)).transpose()
    }

    async fn latest_conversation(
        &self,
        user_id: &str,
        companion_id: &str,
    ) -> Result<Option<Conversation>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations
              WHERE user_id = $1 AND companion_id = $2
              ORDER BY updated_at DESC, created_at DESC
              LIMIT 1"
        ))
        .bind(user_id)
        .bind(companion_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_conversation(&r)).transpose()
    }

    async fn touch_conversation(&self, id: &str) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE conversations SET updated_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound { entity: "conversation", id: id.to_owned() });
        }
        Ok(())
    }
}
