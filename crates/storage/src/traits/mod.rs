//! Storage trait abstraction
//!
//! Async domain traits for the relational entities. Services depend on
//! these rather than on `PgStorage`, which keeps them testable against
//! in-memory fakes.

pub mod companion;
pub mod conversation;
pub mod message;

pub use companion::CompanionStore;
pub use conversation::ConversationStore;
pub use message::MessageStore;

/// Everything the chat pipeline needs from relational storage.
pub trait ChatStore: CompanionStore + ConversationStore + MessageStore {}

impl<T> ChatStore for T where T: CompanionStore + ConversationStore + MessageStore {}
