//! HttpChatTransport - JSON over HTTP for `POST /chat`.
//!
//! Sends the whole transcript as `{ "messages": [...] }` and decodes the
//! `{ reply, action?, target?, message?, diagnosis? }` answer.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use vitalview_core::chat::{ChatReply, ChatRequest, ChatTransport};
use vitalview_core::config::ChatConfig;
use vitalview_core::error::{Result, VitalViewError};

/// [`ChatTransport`] backed by a reqwest client.
#[derive(Clone)]
pub struct HttpChatTransport {
    client: Client,
    endpoint: String,
    inline_directives: bool,
}

impl HttpChatTransport {
    /// Creates a transport for `endpoint` with reqwest defaults.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            inline_directives: false,
        }
    }

    /// Creates a transport from the `[chat]` configuration section.
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| VitalViewError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            inline_directives: config.inline_directives,
        })
    }

    /// Recovers directive fields from JSON embedded in the reply text when
    /// the endpoint sends none.
    pub fn with_inline_directives(mut self, enabled: bool) -> Self {
        self.inline_directives = enabled;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
        tracing::debug!(
            "[HttpChatTransport] POST {} with {} messages",
            self.endpoint,
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                VitalViewError::transport(
                    err.status().map(|s| s.as_u16()),
                    format!("Chat request failed: {err}"),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let body = response.text().await.map_err(|err| {
            VitalViewError::transport(Some(status.as_u16()), format!("Failed to read reply: {err}"))
        })?;
        let reply: ChatReply = serde_json::from_str(&body)?;

        if self.inline_directives {
            Ok(reply.with_inline_fallback())
        } else {
            Ok(reply)
        }
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

fn map_http_error(status: StatusCode, body: String) -> VitalViewError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error)
        .unwrap_or(body);

    VitalViewError::transport(Some(status.as_u16()), message)
}
