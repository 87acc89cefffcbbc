use super::context::{ChatSession, ChatSurface};
use std::sync::Arc;
use uuid::Uuid;
use vitalview_core::chat::ChatTransport;
use vitalview_core::config::AppConfig;
use vitalview_core::error::Result;
use vitalview_core::target::TargetRegistry;
use vitalview_core::viewport::{ViewportController, ViewportHandles};
use vitalview_interaction::HttpChatTransport;

/// Factory for creating [`ChatSession`] instances.
///
/// Holds what is shared between sessions: the configuration, the target
/// registry (fixed once built) and the transport.
pub struct SessionFactory {
    config: AppConfig,
    registry: Arc<TargetRegistry>,
    transport: Arc<dyn ChatTransport>,
}

impl SessionFactory {
    /// Creates a factory that talks to the configured HTTP endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the target table or HTTP client cannot be built.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let transport = HttpChatTransport::from_config(&config.chat)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a factory with a caller-supplied transport.
    pub fn with_transport(config: AppConfig, transport: Arc<dyn ChatTransport>) -> Result<Self> {
        let registry = Arc::new(config.build_registry()?);
        Ok(Self {
            config,
            registry,
            transport,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> Arc<TargetRegistry> {
        self.registry.clone()
    }

    /// Creates a new, empty session bound to the given page elements.
    ///
    /// # Errors
    ///
    /// Returns `MissingHandle` when a viewport handle is absent under
    /// strict handle checking.
    pub fn create_session(
        &self,
        handles: ViewportHandles,
        surface: ChatSurface,
    ) -> Result<ChatSession> {
        let viewport =
            ViewportController::new(handles, self.registry.clone(), self.config.viewport.clone())?;
        let session_id = Uuid::new_v4().to_string();

        tracing::info!(
            "[SessionFactory] Created session {} ({} regions)",
            session_id,
            self.registry.len()
        );

        Ok(ChatSession::new(
            session_id,
            viewport,
            self.transport.clone(),
            surface,
            self.config.chat.error_text.clone(),
        ))
    }
}
