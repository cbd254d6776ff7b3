//! Semantic memory records exchanged with the vector index.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A snippet to upsert into the vector collection.
///
/// `metadata` is stored verbatim as the point payload; the text itself is
/// stored alongside it under a reserved key by the index implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntry {
    pub id: String,
    pub document: String,
    pub embedding: Vec<f32>,
    pub metadata: Map<String, Value>,
}

/// Exact-match conjunction over payload fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFilter {
    pub conditions: Vec<(String, String)>,
}

impl MemoryFilter {
    #[must_use]
    pub fn for_user(user_id: &str) -> Self {
        Self { conditions: vec![("user_id".to_owned(), user_id.to_owned())] }
    }

    #[must_use]
    pub fn and(mut self, key: &str, value: &str) -> Self {
        self.conditions.push((key.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn and_maybe(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.and(key, v),
            None => self,
        }
    }

    /// Whether a payload satisfies every condition.
    #[must_use]
    pub fn matches(&self, metadata: &Map<String, Value>) -> bool {
        self.conditions
            .iter()
            .all(|(key, expected)| metadata.get(key).and_then(Value::as_str) == Some(expected))
    }
}

/// One nearest-neighbour result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryHit {
    pub id: String,
    pub content: String,
    pub metadata: Map<String, Value>,
    /// Cosine distance (`1 - similarity`), lower is closer.
    pub distance: f32,
}

impl MemoryHit {
    /// Role recorded on the hit, `"chat"` for notes and legacy entries.
    #[must_use]
    pub fn role_label(&self) -> &str {
        self.metadata.get("role").and_then(Value::as_str).unwrap_or("chat")
    }
}
