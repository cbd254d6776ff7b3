//! Content-derived identifiers for vector memory points.
//!
//! Point ids are UUIDv5 (SHA-1) of a key string, so writing the same content
//! twice lands on the same point and the upsert is idempotent.

use uuid::Uuid;

/// Namespace for every memory point id.
const MEMORY_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2d0e_9a47_4c55_b1f3_8e2a_47d9_0c31);

fn derive(key: &str) -> String {
    Uuid::new_v5(&MEMORY_NAMESPACE, key.as_bytes()).to_string()
}

/// Id of the point holding one indexed chat message.
#[must_use]
pub fn chat_entry_id(user_id: &str, conversation_id: &str, message_id: &str) -> String {
    derive(&format!("{user_id}:{conversation_id}:{message_id}"))
}

/// Stable id shared by all chunks of one note.
#[must_use]
pub fn note_base_id(user_id: &str, companion_key: &str, kind: &str, content: &str) -> String {
    derive(&format!("v1:{user_id}:{companion_key}:{kind}:{content}"))
}

/// Id of chunk `index` of the note identified by `base_id`.
#[must_use]
pub fn note_chunk_id(base_id: &str, index: usize) -> String {
    derive(&format!("v1:{base_id}:{index}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_deterministic() {
        assert_eq!(chat_entry_id("u", "c", "m"), chat_entry_id("u", "c", "m"));
        assert_eq!(
            note_base_id("u", "__any__", "note", "text"),
            note_base_id("u", "__any__", "note", "text")
        );
    }

    #[test]
    fn test_ids_depend_on_every_component() {
        let base = note_base_id("u", "lydia", "note", "text");
        assert_ne!(base, note_base_id("u2", "lydia", "note", "text"));
        assert_ne!(base, note_base_id("u", "serana", "note", "text"));
        assert_ne!(base, note_base_id("u", "lydia", "fact", "text"));
        assert_ne!(base, note_base_id("u", "lydia", "note", "text!"));
        assert_ne!(note_chunk_id(&base, 0), note_chunk_id(&base, 1));
    }

    #[test]
    fn test_ids_are_valid_uuids() {
        let id = chat_entry_id("u", "c", "m");
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 5);
    }
}
