//! MessageStore implementation for PgStorage.

use super::*;

use crate::traits::MessageStore;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl MessageStore for PgStorage {
    async fn append_message(
        &self,
        conversation_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<Message, StorageError> {
        let row = sqlx::query(&format!(
            "INSERT INTO messages ({MESSAGE_COLUMNS})
             VALUES ($1,$2,$3,$4,$5)
             RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(conversation_id)
        .bind(role.as_str())
        .bind(content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        row_to_message(&row)
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
              WHERE conversation_id = $1
              ORDER BY created_at ASC, seq ASC"
        ))
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_message).collect()
    }

    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
              WHERE conversation_id = $1
              ORDER BY created_at DESC, seq DESC
              LIMIT $2"
        ))
        .bind(conversation_id)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        let mut messages = rows.iter().map(row_to_message).collect::<Result<Vec<_>, _>>()?;
        messages.reverse();
        Ok(messages)
    }
}
