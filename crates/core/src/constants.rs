//! Shared constants for companion-chat.
//!
//! Centralizes the tuning numbers of the chat pipeline so handlers,
//! services and tests agree on them.

/// Number of most recent messages sent to the model as HISTORY.
pub const HISTORY_LIMIT: usize = 20;

/// Number of memory snippets retrieved per chat turn.
pub const RETRIEVAL_TOP_K: u64 = 8;

/// Default `topK` for explicit memory searches.
pub const DEFAULT_SEARCH_TOP_K: u64 = 6;

/// Upper bound for `topK` in explicit memory searches.
pub const MAX_SEARCH_TOP_K: u64 = 20;

/// Window size, in characters, used when chunking memory notes.
pub const CHUNK_SIZE: usize = 1200;

/// Characters shared between two consecutive note chunks.
pub const CHUNK_OVERLAP: usize = 200;

/// Chat messages shorter than this (after trimming) are not indexed.
pub const MIN_INDEXABLE_CHARS: usize = 10;

/// Title given to lazily created conversations.
pub const DEFAULT_CONVERSATION_TITLE: &str = "Skyrim chat";

/// Default `kind` for memory notes.
pub const DEFAULT_NOTE_KIND: &str = "note";

/// `kind` stamped on indexed chat messages.
pub const CHAT_KIND: &str = "chat";

/// `source` stamped on manually added notes.
pub const MANUAL_SOURCE: &str = "manual";

/// Companion key stored on notes that are not tied to a companion.
pub const ANY_COMPANION: &str = "__any__";

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Embedding vector dimension of `text-embedding-3-small`.
pub const DEFAULT_EMBEDDING_DIMENSION: u64 = 1536;
