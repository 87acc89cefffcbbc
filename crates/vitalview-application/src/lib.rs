//! Application layer for VitalView.
//!
//! Wires the conversation store, the viewport controller and a chat
//! transport into a session-scoped [`session::ChatSession`].

pub mod session;

pub use session::{ChatSession, ChatSurface, SendOutcome, SessionFactory};
