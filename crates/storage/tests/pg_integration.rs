//! Integration tests for PgStorage.
//! Run with: DATABASE_URL=... cargo test -p companion-chat-storage -- --ignored pg_

#![allow(clippy::unwrap_used, reason = "integration test code")]

use companion_chat_core::{Companion, MessageRole, NewConversation};
use companion_chat_storage::{
    CompanionStore, ConversationStore, MessageStore, PgStorage, StorageError, seed_companions,
};
use uuid::Uuid;

async fn create_pg_storage() -> PgStorage {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgStorage integration tests");
    PgStorage::new(&url).await.expect("Failed to connect to PostgreSQL")
}

fn unique_id() -> String {
    format!("test-{}", Uuid::new_v4())
}

async fn seeded_companion(storage: &PgStorage) -> Companion {
    let id = unique_id();
    let companion = Companion::new(&id, &id, "Test Companion", "for tests", "Ты — тест.");
    storage.upsert_companion(&companion).await.unwrap();
    companion
}

fn new_conversation(user_id: &str, companion_id: &str) -> NewConversation {
    NewConversation {
        user_id: user_id.to_owned(),
        companion_id: companion_id.to_owned(),
        title: "Skyrim chat".to_owned(),
    }
}

// ── Companion Tests ──────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_seed_is_idempotent() {
    let storage = create_pg_storage().await;
    assert_eq!(seed_companions(&storage).await.unwrap(), 5);
    assert_eq!(seed_companions(&storage).await.unwrap(), 5);

    let lydia = storage.get_companion("lydia").await.unwrap().unwrap();
    assert_eq!(lydia.name, "Lydia");
}

#[tokio::test]
#[ignore]
async fn pg_upsert_companion_replaces_prompt() {
    let storage = create_pg_storage().await;
    let mut companion = seeded_companion(&storage).await;
    companion.system_prompt = "Новый промпт".to_owned();
    storage.upsert_companion(&companion).await.unwrap();

    let fetched = storage.get_companion(&companion.id).await.unwrap().unwrap();
    assert_eq!(fetched.system_prompt, "Новый промпт");
}

// ── Conversation Tests ───────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_conversation_is_scoped_to_user() {
    let storage = create_pg_storage().await;
    let companion = seeded_companion(&storage).await;
    let owner = unique_id();

    let conv = storage.create_conversation(new_conversation(&owner, &companion.id)).await.unwrap();
    assert_eq!(conv.created_at, conv.updated_at);

    assert!(storage.find_conversation_for_user(&conv.id, &owner).await.unwrap().is_some());
    assert!(storage.find_conversation_for_user(&conv.id, "someone-else").await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn pg_latest_conversation_follows_touch() {
    let storage = create_pg_storage().await;
    let companion = seeded_companion(&storage).await;
    let user = unique_id();

    let first = storage.create_conversation(new_conversation(&user, &companion.id)).await.unwrap();
    let second = storage.create_conversation(new_conversation(&user, &companion.id)).await.unwrap();
    let latest = storage.latest_conversation(&user, &companion.id).await.unwrap().unwrap();
    assert_eq!(latest.id, second.id);

    storage.touch_conversation(&first.id).await.unwrap();
    let latest = storage.latest_conversation(&user, &companion.id).await.unwrap().unwrap();
    assert_eq!(latest.id, first.id);
}

#[tokio::test]
#[ignore]
async fn pg_conversation_for_unknown_companion_is_rejected() {
    let storage = create_pg_storage().await;
    let err = storage
        .create_conversation(new_conversation(&unique_id(), &unique_id()))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidReference(_)));
}

#[tokio::test]
#[ignore]
async fn pg_touch_missing_conversation_is_not_found() {
    let storage = create_pg_storage().await;
    let err = storage.touch_conversation(&unique_id()).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { entity: "conversation", .. }));
}

// ── Message Tests ────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_messages_keep_append_order() {
    let storage = create_pg_storage().await;
    let companion = seeded_companion(&storage).await;
    let conv =
        storage.create_conversation(new_conversation(&unique_id(), &companion.id)).await.unwrap();

    for i in 0..25 {
        let role = if i % 2 == 0 { MessageRole::User } else { MessageRole::Assistant };
        storage.append_message(&conv.id, role, &format!("message {i}")).await.unwrap();
    }

    let all = storage.list_messages(&conv.id).await.unwrap();
    assert_eq!(all.len(), 25);
    assert_eq!(all[0].content, "message 0");
    assert_eq!(all[24].content, "message 24");

    let recent = storage.recent_messages(&conv.id, 20).await.unwrap();
    assert_eq!(recent.len(), 20);
    assert_eq!(recent[0].content, "message 5");
    assert_eq!(recent[19].content, "message 24");
    assert_eq!(recent[19].role, MessageRole::User);
}
