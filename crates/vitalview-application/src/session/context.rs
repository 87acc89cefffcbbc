use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use vitalview_core::chat::{ChatRequest, ChatTransport, ViewportDirective};
use vitalview_core::conversation::{ConversationStore, Turn};
use vitalview_core::error::VitalViewError;
use vitalview_core::ui::{InputField, MessageLog};
use vitalview_core::viewport::ViewportController;

/// Page elements of the chat widget.
#[derive(Clone)]
pub struct ChatSurface {
    pub input: Arc<dyn InputField>,
    pub log: Arc<dyn MessageLog>,
}

impl ChatSurface {
    pub fn new(input: Arc<dyn InputField>, log: Arc<dyn MessageLog>) -> Self {
        Self { input, log }
    }
}

/// What a call to [`ChatSession::send`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Input was empty after trimming; nothing was recorded or sent.
    Ignored,
    /// The reply was recorded; `directive` is what the viewport was asked to show.
    Replied {
        sequence: u64,
        directive: Option<ViewportDirective>,
    },
    /// A newer request was issued before this one completed; its reply was
    /// discarded.
    Superseded { sequence: u64 },
    /// The transport failed; the fixed error text was recorded instead.
    TransportFailed { sequence: u64, error: VitalViewError },
}

/// State of one chat session: transcript, viewport and transport.
///
/// Owned by the UI layer and dropped with the view. Requests are numbered;
/// only the reply to the most recently issued request is applied, so the
/// transcript and viewport always reflect the latest exchange.
pub struct ChatSession {
    id: String,
    conversation: Mutex<ConversationStore>,
    viewport: ViewportController,
    transport: Arc<dyn ChatTransport>,
    surface: ChatSurface,
    error_text: String,
    latest_request: AtomicU64,
}

impl ChatSession {
    pub fn new(
        id: impl Into<String>,
        viewport: ViewportController,
        transport: Arc<dyn ChatTransport>,
        surface: ChatSurface,
        error_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            conversation: Mutex::new(ConversationStore::new()),
            viewport,
            transport,
            surface,
            error_text: error_text.into(),
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    /// Copy of the transcript so far.
    pub async fn transcript(&self) -> Vec<Turn> {
        self.conversation.lock().await.snapshot()
    }

    /// Sequence number of the most recently issued request (0 before any).
    pub fn latest_sequence(&self) -> u64 {
        self.latest_request.load(Ordering::SeqCst)
    }

    /// Sends one user message and applies the assistant's reply.
    ///
    /// Empty input is ignored. Otherwise the user turn is recorded, the input
    /// is cleared and the full transcript is sent. Transport failures are
    /// recorded as an assistant turn with the configured error text and
    /// never returned as an error.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let content = text.trim();
        if content.is_empty() {
            return SendOutcome::Ignored;
        }

        let user_turn = Turn::user(content);
        let (request, sequence) = {
            let mut conversation = self.conversation.lock().await;
            conversation.append(user_turn.clone());
            let sequence = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
            (ChatRequest::new(conversation.snapshot()), sequence)
        };
        self.surface.log.push(&user_turn);
        self.surface.input.clear();

        tracing::debug!(
            "[ChatSession] session={} request #{} with {} turns",
            self.id,
            sequence,
            request.messages.len()
        );
        let result = self.transport.send(&request).await;

        let (turn, outcome) = match result {
            Ok(reply) => {
                let directive = reply.directive();
                (
                    Turn::assistant(reply.reply),
                    SendOutcome::Replied {
                        sequence,
                        directive,
                    },
                )
            }
            Err(error) => {
                tracing::warn!(
                    "[ChatSession] session={} request #{} failed: {}",
                    self.id,
                    sequence,
                    error
                );
                (
                    Turn::assistant(self.error_text.clone()),
                    SendOutcome::TransportFailed { sequence, error },
                )
            }
        };

        {
            let mut conversation = self.conversation.lock().await;
            if self.latest_request.load(Ordering::SeqCst) != sequence {
                tracing::debug!(
                    "[ChatSession] session={} discarding reply to superseded request #{}",
                    self.id,
                    sequence
                );
                return SendOutcome::Superseded { sequence };
            }
            conversation.append(turn.clone());
        }
        self.surface.log.push(&turn);

        if let SendOutcome::Replied {
            directive: Some(directive),
            ..
        } = &outcome
        {
            self.viewport
                .show(&directive.target, &directive.explanation)
                .await;
        }

        outcome
    }
}
