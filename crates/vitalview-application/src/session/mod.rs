//! Chat session services.
//!
//! - `context`: The session-scoped context and turn dispatcher (`ChatSession`)
//! - `factory`: Builds sessions from configuration (`SessionFactory`)

mod context;
mod factory;

pub use context::{ChatSession, ChatSurface, SendOutcome};
pub use factory::SessionFactory;
