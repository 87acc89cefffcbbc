//! Chat endpoint contract.
//!
//! - `reply`: Wire types for `POST /chat` and the viewport directive carried by a reply
//! - `transport`: The `ChatTransport` port implemented by network adapters
//! - `format`: List detection for rendering assistant text

mod format;
mod reply;
mod transport;

pub use format::{FormattedReply, format_reply};
pub use reply::{
    ChatReply, ChatRequest, DirectiveKind, HIGHLIGHT_ACTION, InlineDirective, ViewportDirective,
    extract_inline_directive,
};
pub use transport::ChatTransport;
