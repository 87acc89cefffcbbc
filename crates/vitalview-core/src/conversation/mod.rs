//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: Transcript entry types (`Role`, `Turn`)
//! - `store`: The append-only transcript (`ConversationStore`)

mod message;
mod store;

// Re-export public API
pub use message::{Role, Turn};
pub use store::ConversationStore;
