//! Core types for companion-chat
//!
//! Domain records shared by every other crate, plus the small amount of
//! in-process logic the chat pipeline owns: chunking, snippet dedupe,
//! content-derived ids and prompt assembly.

mod chat;
mod companion;
mod constants;
mod env_config;
mod error;
mod ids;
mod memory;
mod prompt;
mod text;

pub use chat::*;
pub use companion::*;
pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use ids::*;
pub use memory::*;
pub use prompt::*;
pub use text::*;
