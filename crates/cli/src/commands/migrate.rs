//! Schema migration command.
//!
//! Connecting applies every migration; they are idempotent.

use anyhow::Result;
use companion_chat_storage::PgStorage;

pub(crate) async fn run() -> Result<()> {
    let storage = PgStorage::new(&crate::config::database_url()?).await?;
    storage.ping().await?;
    println!("Migrations applied");
    Ok(())
}
