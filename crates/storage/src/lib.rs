//! Storage layer for companion-chat
//!
//! PostgreSQL (sqlx) persistence for the three relational entities:
//! companions, conversations and messages. Vector memory lives elsewhere
//! and is never reconciled with these tables.

mod error;
mod pg_migrations;
mod pg_storage;
mod seed;
pub mod traits;

pub use error::StorageError;
pub use pg_migrations::run_pg_migrations;
pub use pg_storage::PgStorage;
pub use seed::seed_companions;
pub use traits::{ChatStore, CompanionStore, ConversationStore, MessageStore};
