use super::reply::{ChatReply, ChatRequest};
use crate::error::Result;
use async_trait::async_trait;

/// Sends a transcript to the assistant backend and returns its reply.
///
/// Implementations perform exactly one attempt per call; retries and
/// sequencing are the caller's concern.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply>;
}
