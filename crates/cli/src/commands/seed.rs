use anyhow::Result;
use companion_chat_storage::{PgStorage, seed_companions};

pub(crate) async fn run() -> Result<()> {
    let storage = PgStorage::new(&crate::config::database_url()?).await?;
    let count = seed_companions(&storage).await?;
    println!("Seeded {count} companions");
    Ok(())
}
