//! Response types (Serialize)

use companion_chat_core::Companion;
use companion_chat_service::{ChatHistory, ChatReply, MemoryItem, NoteAdded};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}

/// Public view of a companion; the system prompt stays server-side.
#[derive(Debug, Serialize)]
pub struct CompanionSummary {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
}

impl From<Companion> for CompanionSummary {
    fn from(c: Companion) -> Self {
        Self { id: c.id, slug: c.slug, name: c.name, description: c.description }
    }
}

#[derive(Debug, Serialize)]
pub struct CompanionsResponse {
    pub ok: bool,
    pub companions: Vec<CompanionSummary>,
}

/// `{"ok": true, ...payload}`
#[derive(Debug, Serialize)]
pub struct OkBody<T> {
    pub ok: bool,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> OkBody<T> {
    pub const fn new(payload: T) -> Self {
        Self { ok: true, payload }
    }
}

pub type HistoryResponse = OkBody<ChatHistory>;
pub type SendResponse = OkBody<ChatReply>;
pub type NoteAddedResponse = OkBody<NoteAdded>;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub ok: bool,
    pub items: Vec<MemoryItem>,
}
