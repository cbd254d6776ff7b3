use anyhow::Result;
use companion_chat_storage::{CompanionStore, PgStorage};

pub(crate) async fn run() -> Result<()> {
    let storage = PgStorage::new(&crate::config::database_url()?).await?;
    let companions = storage.list_companions().await?;
    println!("{}", serde_json::to_string_pretty(&companions)?);
    Ok(())
}
