//! Service layer for companion-chat
//!
//! Centralizes the chat pipeline and memory operations between the HTTP
//! handlers and the storage, model, embedding and vector collaborators.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Services hold trait objects")]

mod chat_service;
mod companion_service;
mod error;
mod memory_service;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use chat_service::{ChatHistory, ChatReply, ChatService, CompanionRef, SendMessage};
pub use companion_service::CompanionService;
pub use error::ServiceError;
pub use memory_service::{AddNote, ChatScope, MemoryItem, MemoryService, NoteAdded, SearchMemory};
