//! Semantic memory: manual notes, explicit search, chat indexing.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use companion_chat_core::{
    ANY_COMPANION, CHAT_KIND, CHUNK_OVERLAP, CHUNK_SIZE, DEFAULT_NOTE_KIND, DEFAULT_SEARCH_TOP_K,
    MANUAL_SOURCE, MAX_SEARCH_TOP_K, MemoryEntry, MemoryFilter, MemoryHit, Message,
    chat_entry_id, chunk_text, note_base_id, note_chunk_id, should_index,
};
use companion_chat_embeddings::EmbeddingProvider;
use companion_chat_vector::MemoryIndex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{ServiceError, require_text};

/// A free-form note to remember.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNote {
    pub content: String,
    pub kind: Option<String>,
    pub companion_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteAdded {
    pub added: usize,
    pub base_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMemory {
    pub query: String,
    pub top_k: Option<u64>,
    pub companion_id: Option<String>,
    pub kind: Option<String>,
}

/// One search result as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryItem {
    pub content: String,
    pub metadata: Map<String, Value>,
    pub distance: f32,
}

impl From<MemoryHit> for MemoryItem {
    fn from(hit: MemoryHit) -> Self {
        Self { content: hit.content, metadata: hit.metadata, distance: hit.distance }
    }
}

/// Where an indexed chat message belongs.
#[derive(Debug, Clone, Copy)]
pub struct ChatScope<'a> {
    pub user_id: &'a str,
    pub companion_id: &'a str,
    pub conversation_id: &'a str,
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub struct MemoryService {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn MemoryIndex>,
}

impl MemoryService {
    #[must_use]
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<dyn MemoryIndex>) -> Self {
        Self { embedder, index }
    }

    /// Chunk, embed and upsert a note. Identical notes land on the same ids.
    pub async fn add_note(&self, user_id: &str, input: AddNote) -> Result<NoteAdded, ServiceError> {
        let content = require_text("content", &input.content)?;
        let kind = non_blank(input.kind.as_deref()).unwrap_or(DEFAULT_NOTE_KIND);
        let companion_key = non_blank(input.companion_id.as_deref()).unwrap_or(ANY_COMPANION);

        // Non-blank content always yields at least one chunk.
        let chunks = chunk_text(content, CHUNK_SIZE, CHUNK_OVERLAP);

        let embeddings = self.embedder.embed(&chunks).await?;
        let base_id = note_base_id(user_id, companion_key, kind, content);
        let created_at = rfc3339(Utc::now());

        let entries: Vec<MemoryEntry> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(idx, (document, embedding))| MemoryEntry {
                id: note_chunk_id(&base_id, idx),
                document,
                embedding,
                metadata: into_map(json!({
                    "user_id": user_id,
                    "companion_id": companion_key,
                    "kind": kind,
                    "source": MANUAL_SOURCE,
                    "base_id": base_id,
                    "chunk_index": idx,
                    "created_at": created_at,
                })),
            })
            .collect();

        let added = entries.len();
        self.index.upsert(entries).await?;
        debug!(user_id, base_id = %base_id, added, "Note indexed");
        Ok(NoteAdded { added, base_id })
    }

    /// Nearest snippets for `query`, scoped to the user.
    pub async fn search(
        &self,
        user_id: &str,
        input: SearchMemory,
    ) -> Result<Vec<MemoryItem>, ServiceError> {
        let query = require_text("query", &input.query)?;
        let top_k = input.top_k.unwrap_or(DEFAULT_SEARCH_TOP_K);
        if !(1..=MAX_SEARCH_TOP_K).contains(&top_k) {
            return Err(ServiceError::invalid(format!(
                "topK must be between 1 and {MAX_SEARCH_TOP_K}"
            )));
        }

        let filter = MemoryFilter::for_user(user_id)
            .and_maybe("companion_id", non_blank(input.companion_id.as_deref()))
            .and_maybe("kind", non_blank(input.kind.as_deref()));

        let hits = self.retrieve(query, &filter, top_k).await?;
        Ok(hits.into_iter().map(MemoryItem::from).collect())
    }

    /// Embed `query` and fetch up to `top_k` hits matching `filter`.
    pub async fn retrieve(
        &self,
        query: &str,
        filter: &MemoryFilter,
        top_k: u64,
    ) -> Result<Vec<MemoryHit>, ServiceError> {
        let vector = self.embedder.embed_one(query).await?;
        Ok(self.index.query(&vector, filter, top_k).await?)
    }

    /// Index one chat message as a single snippet. Returns whether it was
    /// long enough to be indexed.
    pub async fn index_chat_message(
        &self,
        scope: ChatScope<'_>,
        message: &Message,
    ) -> Result<bool, ServiceError> {
        if !should_index(&message.content) {
            return Ok(false);
        }
        let document = message.content.trim().to_owned();
        let embedding = self.embedder.embed_one(&document).await?;

        let entry = MemoryEntry {
            id: chat_entry_id(scope.user_id, scope.conversation_id, &message.id),
            document,
            embedding,
            metadata: into_map(json!({
                "user_id": scope.user_id,
                "companion_id": scope.companion_id,
                "conversation_id": scope.conversation_id,
                "message_id": message.id,
                "role": message.role.as_str(),
                "kind": CHAT_KIND,
                "created_at": rfc3339(message.created_at),
            })),
        };
        self.index.upsert(vec![entry]).await?;
        Ok(true)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryIndex, StubEmbedder};
    use companion_chat_core::MessageRole;

    fn service() -> (MemoryService, Arc<InMemoryIndex>, Arc<StubEmbedder>) {
        let index = Arc::new(InMemoryIndex::default());
        let embedder = Arc::new(StubEmbedder::default());
        (MemoryService::new(embedder.clone(), index.clone()), index, embedder)
    }

    fn note(content: &str) -> AddNote {
        AddNote { content: content.to_owned(), ..Default::default() }
    }

    fn query(text: &str) -> SearchMemory {
        SearchMemory { query: text.to_owned(), ..Default::default() }
    }

    fn message(id: &str, role: MessageRole, content: &str) -> Message {
        Message {
            id: id.to_owned(),
            conversation_id: "c1".to_owned(),
            role,
            content: content.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_add_note_defaults_kind_and_companion() {
        let (svc, index, _) = service();
        let added = svc.add_note("u1", note("  I owe Belethor 50 septims ")).await.unwrap();
        assert_eq!(added.added, 1);
        let base_id = added.base_id;

        let entries = index.entries();
        assert_eq!(entries.len(), 1);
        let meta = &entries[0].metadata;
        assert_eq!(meta["kind"], "note");
        assert_eq!(meta["companion_id"], "__any__");
        assert_eq!(meta["source"], "manual");
        assert_eq!(meta["base_id"], base_id.as_str());
        assert_eq!(meta["chunk_index"], 0);
        assert_eq!(entries[0].document, "I owe Belethor 50 septims");
    }

    #[tokio::test]
    async fn test_blank_companion_falls_back_to_any() {
        let (svc, index, _) = service();
        let input =
            AddNote { companion_id: Some("   ".into()), ..note("Whiterun sits on the plains") };
        let added = svc.add_note("u1", input).await.unwrap();
        let expected =
            note_base_id("u1", ANY_COMPANION, DEFAULT_NOTE_KIND, "Whiterun sits on the plains");
        assert_eq!(added.base_id, expected);
        assert_eq!(index.entries()[0].metadata["companion_id"], ANY_COMPANION);
    }

    #[tokio::test]
    async fn test_add_note_is_idempotent() {
        let (svc, index, _) = service();
        let input = AddNote {
            content: "Serana prefers night travel".into(),
            kind: Some(" lore ".into()),
            companion_id: Some("serana".into()),
        };
        let first = svc.add_note("u1", input.clone()).await.unwrap();
        let second = svc.add_note("u1", input).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(index.entries().len(), 1);
        assert_eq!(index.entries()[0].metadata["kind"], "lore");
    }

    #[tokio::test]
    async fn test_long_note_is_chunked() {
        let (svc, index, _) = service();
        let content = "word ".repeat(600);
        let added = svc
            .add_note("u1", AddNote { content, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(added.added, 3);
        let mut indices: Vec<i64> = index
            .entries()
            .iter()
            .map(|e| e.metadata["chunk_index"].as_i64().unwrap())
            .collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_blank_note_is_rejected() {
        let (svc, index, _) = service();
        let err = svc
            .add_note("u1", AddNote { content: "   ".into(), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(index.entries().is_empty());
    }

    #[tokio::test]
    async fn test_search_validates_top_k() {
        let (svc, _, _) = service();
        for top_k in [0, 21] {
            let input = SearchMemory { top_k: Some(top_k), ..query("q") };
            let err = svc.search("u1", input).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_search_is_scoped_by_user_companion_and_kind() {
        let (svc, _, _) = service();
        let lydia_note = AddNote { companion_id: Some("lydia".into()), ..note("dragon stone") };
        svc.add_note("u1", lydia_note).await.unwrap();
        let fact = AddNote { kind: Some("fact".into()), ..note("dragon bones") };
        svc.add_note("u1", fact).await.unwrap();
        svc.add_note("u2", note("dragon stone")).await.unwrap();

        let all = svc.search("u1", query("dragon")).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|i| i.metadata["user_id"] == "u1"));

        let input = SearchMemory { companion_id: Some(" lydia ".into()), ..query("dragon") };
        let lydia = svc.search("u1", input).await.unwrap();
        assert_eq!(lydia.len(), 1);
        assert_eq!(lydia[0].content, "dragon stone");

        let input = SearchMemory { kind: Some("fact".into()), ..query("dragon") };
        let facts = svc.search("u1", input).await.unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].content, "dragon bones");
    }

    #[tokio::test]
    async fn test_search_exact_text_has_zero_distance() {
        let (svc, _, _) = service();
        svc.add_note("u1", note("sweetroll")).await.unwrap();
        let input = SearchMemory { top_k: Some(1), ..query("sweetroll") };
        let items = svc.search("u1", input).await.unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].distance.abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_short_chat_message_is_not_indexed() {
        let (svc, index, embedder) = service();
        let scope = ChatScope { user_id: "u1", companion_id: "lydia", conversation_id: "c1" };
        let short = message("m1", MessageRole::User, "ок");
        let indexed = svc.index_chat_message(scope, &short).await.unwrap();
        assert!(!indexed);
        assert!(index.entries().is_empty());
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_chat_message_metadata() {
        let (svc, index, _) = service();
        let scope = ChatScope { user_id: "u1", companion_id: "lydia", conversation_id: "c1" };
        let msg = message("m1", MessageRole::Assistant, "  I am sworn to carry your burdens. ");
        assert!(svc.index_chat_message(scope, &msg).await.unwrap());
        assert!(svc.index_chat_message(scope, &msg).await.unwrap());

        let entries = index.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, chat_entry_id("u1", "c1", "m1"));
        assert_eq!(entries[0].document, "I am sworn to carry your burdens.");
        let meta = &entries[0].metadata;
        assert_eq!(meta["role"], "assistant");
        assert_eq!(meta["kind"], "chat");
        assert_eq!(meta["message_id"], "m1");
        assert_eq!(meta["conversation_id"], "c1");
    }
}
