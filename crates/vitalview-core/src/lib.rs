//! Domain model and ports for the VitalView chat-driven body viewer.
//!
//! A patient chats with an assistant; when a reply names an anatomical
//! region, the [`viewport::ViewportController`] frames that region in an
//! external 3D viewer and places a marker that explains it on click.

pub mod chat;
pub mod config;
pub mod conversation;
pub mod error;
pub mod target;
pub mod ui;
pub mod viewport;

// Re-export common error type
pub use error::VitalViewError;
