//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by entity.

mod companions;
mod conversations;
mod messages;

use std::time::Duration;

use crate::error::StorageError;
use companion_chat_core::{
    Companion, Conversation, Message, MessageRole, PG_POOL_ACQUIRE_TIMEOUT_SECS,
    PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use super::pg_migrations::run_pg_migrations;

pub(crate) const COMPANION_COLUMNS: &str = "id, slug, name, description, system_prompt";
pub(crate) const CONVERSATION_COLUMNS: &str =
    "id, user_id, companion_id, title, created_at, updated_at";
pub(crate) const MESSAGE_COLUMNS: &str = "id, conversation_id, role, content, created_at";

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connect, then apply migrations.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }

    /// Cheap liveness probe for readiness checks.
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

pub(crate) fn row_to_companion(row: &sqlx::postgres::PgRow) -> Result<Companion, StorageError> {
    Ok(Companion {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        system_prompt: row.try_get("system_prompt")?,
    })
}

pub(crate) fn row_to_conversation(
    row: &sqlx::postgres::PgRow,
) -> Result<Conversation, StorageError> {
    Ok(Conversation {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        companion_id: row.try_get("companion_id")?,
        title: row.try_get("title")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn row_to_message(row: &sqlx::postgres::PgRow) -> Result<Message, StorageError> {
    let role_str: String = row.try_get("role")?;
    let role = role_str.parse::<MessageRole>().map_err(|e| StorageError::DataCorruption {
        context: format!("messages.role = {role_str:?}"),
        source: Box::new(e),
    })?;
    Ok(Message {
        id: row.try_get("id")?,
        conversation_id: row.try_get("conversation_id")?,
        role,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Convert `usize` to `i64` for SQL LIMIT binds.
/// Saturates to `i64::MAX` on overflow (only possible on 128-bit targets).
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}
