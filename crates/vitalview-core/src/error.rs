//! Error types for VitalView.

use thiserror::Error;

/// A shared error type for the VitalView crates.
///
/// Most user-facing paths never surface these: the dispatcher turns transport
/// failures into an assistant turn and unknown targets degrade to the default
/// region. They matter for construction, configuration and adapters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VitalViewError {
    /// The chat endpoint could not be reached or answered with an error status
    #[error(
        "Transport error{}: {}",
        .status_code.map(|c| format!(" ({c})")).unwrap_or_default(),
        .message
    )]
    Transport {
        status_code: Option<u16>,
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A UI handle the viewport controller requires was not provided
    #[error("Missing UI handle: {handle}")]
    MissingHandle { handle: &'static str },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },
}

impl VitalViewError {
    /// Creates a Transport error
    pub fn transport(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a MissingHandle error
    pub fn missing_handle(handle: &'static str) -> Self {
        Self::MissingHandle { handle }
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<std::io::Error> for VitalViewError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for VitalViewError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for VitalViewError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, VitalViewError>`.
pub type Result<T> = std::result::Result<T, VitalViewError>;
