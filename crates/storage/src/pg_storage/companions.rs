//! CompanionStore implementation for PgStorage.

use super::*;

use crate::traits::CompanionStore;
use async_trait::async_trait;

#[async_trait]
impl CompanionStore for PgStorage {
    async fn upsert_companion(&self, companion: &Companion) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO companions ({COMPANION_COLUMNS})
             VALUES ($1,$2,$3,$4,$5)
             ON CONFLICT (id) DO UPDATE SET
               slug = EXCLUDED.slug,
               name = EXCLUDED.name,
               description = EXCLUDED.description,
               system_prompt = EXCLUDED.system_prompt"
        ))
        .bind(&companion.id)
        .bind(&companion.slug)
        .bind(&companion.name)
        .bind(&companion.description)
        .bind(&companion.system_prompt)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_companion(&self, id: &str) -> Result<Option<Companion>, StorageError> {
        let row = sqlx::query(&format!("SELECT {COMPANION_COLUMNS} FROM companions WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_companion(&r)).transpose()
    }

    async fn list_companions(&self) -> Result<Vec<Companion>, StorageError> {
        let rows = sqlx::query(&format!("SELECT {COMPANION_COLUMNS} FROM companions ORDER BY name"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_companion).collect()
    }
}
