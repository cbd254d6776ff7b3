//! In-memory collaborators for exercising services and routers without
//! PostgreSQL, Qdrant or a model endpoint.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use companion_chat_core::{
    Companion, Conversation, MemoryEntry, MemoryFilter, MemoryHit, Message, MessageRole,
    NewConversation, PromptMessage, default_companions,
};
use companion_chat_embeddings::{EmbeddingError, EmbeddingProvider};
use companion_chat_llm::{ChatModel, LlmError};
use companion_chat_storage::{CompanionStore, ConversationStore, MessageStore, StorageError};
use companion_chat_vector::{IndexError, MemoryIndex};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct Tables {
    companions: HashMap<String, Companion>,
    conversations: Vec<(u64, Conversation)>,
    messages: Vec<(u64, Message)>,
    seq: u64,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.seq = self.seq.saturating_add(1);
        self.seq
    }
}

/// Relational store backed by vectors in a mutex.
#[derive(Default)]
pub struct InMemoryChatStore {
    tables: Mutex<Tables>,
}

impl InMemoryChatStore {
    /// Store pre-populated with the built-in companions.
    #[must_use]
    pub fn seeded() -> Self {
        let store = Self::default();
        {
            let mut tables = lock(&store.tables);
            for companion in default_companions() {
                tables.companions.insert(companion.id.clone(), companion);
            }
        }
        store
    }

    #[must_use]
    pub fn conversations(&self) -> Vec<Conversation> {
        lock(&self.tables).conversations.iter().map(|(_, c)| c.clone()).collect()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        lock(&self.tables).messages.iter().map(|(_, m)| m.clone()).collect()
    }
}

#[async_trait]
impl CompanionStore for InMemoryChatStore {
    async fn upsert_companion(&self, companion: &Companion) -> Result<(), StorageError> {
        lock(&self.tables).companions.insert(companion.id.clone(), companion.clone());
        Ok(())
    }

    async fn get_companion(&self, id: &str) -> Result<Option<Companion>, StorageError> {
        Ok(lock(&self.tables).companions.get(id).cloned())
    }

    async fn list_companions(&self) -> Result<Vec<Companion>, StorageError> {
        let mut all: Vec<Companion> = lock(&self.tables).companions.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}

#[async_trait]
impl ConversationStore for InMemoryChatStore {
    async fn create_conversation(
        &self,
        input: NewConversation,
    ) -> Result<Conversation, StorageError> {
        let mut tables = lock(&self.tables);
        if !tables.companions.contains_key(&input.companion_id) {
            return Err(StorageError::InvalidReference(format!(
                "companion '{}' does not exist",
                input.companion_id
            )));
        }
        let now = Utc::now();
        let conversation = Conversation {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: input.user_id,
            companion_id: input.companion_id,
            title: input.title,
            created_at: now,
            updated_at: now,
        };
        let seq = tables.next_seq();
        tables.conversations.push((seq, conversation.clone()));
        Ok(conversation)
    }

    async fn find_conversation_for_user(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<Conversation>, StorageError> {
        Ok(lock(&self.tables)
            .conversations
            .iter()
            .map(|(_, c)| c)
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned())
    }

    async fn latest_conversation(
        &self,
        user_id: &str,
        companion_id: &str,
    ) -> Result<Option<Conversation>, StorageError> {
        Ok(lock(&self.tables)
            .conversations
            .iter()
            .filter(|(_, c)| c.user_id == user_id && c.companion_id == companion_id)
            .max_by_key(|(seq, c)| (c.updated_at, *seq))
            .map(|(_, c)| c.clone()))
    }

    async fn touch_conversation(&self, id: &str) -> Result<(), StorageError> {
        let mut tables = lock(&self.tables);
        let seq = tables.next_seq();
        let (slot, conv) = tables
            .conversations
            .iter_mut()
            .find(|(_, c)| c.id == id)
            .ok_or_else(|| StorageError::NotFound { entity: "conversation", id: id.to_owned() })?;
        conv.updated_at = Utc::now();
        *slot = seq;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for InMemoryChatStore {
    async fn append_message(
        &self,
        conversation_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<Message, StorageError> {
        let mut tables = lock(&self.tables);
        if !tables.conversations.iter().any(|(_, c)| c.id == conversation_id) {
            return Err(StorageError::InvalidReference(format!(
                "conversation '{conversation_id}' does not exist"
            )));
        }
        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_owned(),
            role,
            content: content.to_owned(),
            created_at: Utc::now(),
        };
        let seq = tables.next_seq();
        tables.messages.push((seq, message.clone()));
        Ok(message)
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>, StorageError> {
        Ok(lock(&self.tables)
            .messages
            .iter()
            .filter(|(_, m)| m.conversation_id == conversation_id)
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, StorageError> {
        let all = self.list_messages(conversation_id).await?;
        let skip = all.len().saturating_sub(limit);
        Ok(all.into_iter().skip(skip).collect())
    }
}

const STUB_DIMENSION: usize = 32;

/// Deterministic bag-of-words embedder. Identical texts get identical
/// vectors; texts sharing words point in similar directions.
#[derive(Default)]
pub struct StubEmbedder {
    calls: Mutex<usize>,
}

impl StubEmbedder {
    #[must_use]
    pub fn calls(&self) -> usize {
        *lock(&self.calls)
    }

    #[must_use]
    pub fn vector_for(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; STUB_DIMENSION];
        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            let bucket = word
                .bytes()
                .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(usize::from(b)))
                % STUB_DIMENSION;
            if let Some(slot) = vector.get_mut(bucket) {
                *slot += 1.0;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        *lock(&self.calls) += 1;
        Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 { 0.0 } else { dot / (norm_a * norm_b) }
}

/// Brute-force cosine index with upsert-by-id semantics.
#[derive(Default)]
pub struct InMemoryIndex {
    entries: Mutex<Vec<MemoryEntry>>,
}

impl InMemoryIndex {
    #[must_use]
    pub fn entries(&self) -> Vec<MemoryEntry> {
        lock(&self.entries).clone()
    }
}

#[async_trait]
impl MemoryIndex for InMemoryIndex {
    async fn ensure_ready(&self) -> Result<(), IndexError> {
        Ok(())
    }

    async fn upsert(&self, entries: Vec<MemoryEntry>) -> Result<(), IndexError> {
        let mut stored = lock(&self.entries);
        for entry in entries {
            match stored.iter_mut().find(|e| e.id == entry.id) {
                Some(existing) => *existing = entry,
                None => stored.push(entry),
            }
        }
        Ok(())
    }

    async fn query(
        &self,
        embedding: &[f32],
        filter: &MemoryFilter,
        top_k: u64,
    ) -> Result<Vec<MemoryHit>, IndexError> {
        let mut hits: Vec<MemoryHit> = lock(&self.entries)
            .iter()
            .filter(|e| filter.matches(&e.metadata))
            .map(|e| MemoryHit {
                id: e.id.clone(),
                content: e.document.clone(),
                metadata: e.metadata.clone(),
                distance: 1.0 - cosine_similarity(embedding, &e.embedding),
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(usize::try_from(top_k).unwrap_or(usize::MAX));
        Ok(hits)
    }
}

/// Chat model replaying canned answers and recording every prompt.
pub struct ScriptedChatModel {
    answers: Mutex<Vec<Result<String, u16>>>,
    fallback: String,
    prompts: Mutex<Vec<Vec<PromptMessage>>>,
}

impl ScriptedChatModel {
    /// Always answers `answer`.
    #[must_use]
    pub fn answering(answer: &str) -> Self {
        Self {
            answers: Mutex::new(Vec::new()),
            fallback: answer.to_owned(),
            prompts: Mutex::default(),
        }
    }

    /// Fails the next call with HTTP `status`.
    #[must_use]
    pub fn then_fail(self, status: u16) -> Self {
        lock(&self.answers).push(Err(status));
        self
    }

    /// Every prompt received so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<Vec<PromptMessage>> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, LlmError> {
        lock(&self.prompts).push(messages.to_vec());
        let next = {
            let mut answers = lock(&self.answers);
            if answers.is_empty() { None } else { Some(answers.remove(0)) }
        };
        match next {
            Some(Ok(answer)) => Ok(answer),
            Some(Err(code)) => {
                Err(LlmError::HttpStatus { code, body: "scripted failure".to_owned() })
            },
            None => Ok(self.fallback.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recent_messages_keeps_newest_in_order() {
        let store = InMemoryChatStore::seeded();
        let conv = store
            .create_conversation(NewConversation {
                user_id: "u".into(),
                companion_id: "lydia".into(),
                title: "t".into(),
            })
            .await
            .unwrap();
        for i in 0..5 {
            store.append_message(&conv.id, MessageRole::User, &format!("m{i}")).await.unwrap();
        }
        let recent = store.recent_messages(&conv.id, 3).await.unwrap();
        let contents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn test_index_upsert_replaces_by_id() {
        let index = InMemoryIndex::default();
        let entry = |doc: &str| MemoryEntry {
            id: "same".into(),
            document: doc.into(),
            embedding: StubEmbedder::vector_for(doc),
            metadata: serde_json::Map::new(),
        };
        index.upsert(vec![entry("first")]).await.unwrap();
        index.upsert(vec![entry("second")]).await.unwrap();
        assert_eq!(index.entries().len(), 1);
        assert_eq!(index.entries()[0].document, "second");
    }
}
