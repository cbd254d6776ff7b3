//! Persona catalogue seeding.

use companion_chat_core::default_companions;

use crate::error::StorageError;
use crate::traits::CompanionStore;

/// Upsert every built-in companion. Returns how many were written.
pub async fn seed_companions<S>(store: &S) -> Result<usize, StorageError>
where
    S: CompanionStore + ?Sized,
{
    let companions = default_companions();
    for companion in &companions {
        store.upsert_companion(companion).await?;
        tracing::debug!(id = %companion.id, "companion seeded");
    }
    tracing::info!(count = companions.len(), "companion catalogue seeded");
    Ok(companions.len())
}
