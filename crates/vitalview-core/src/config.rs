//! Application configuration.
//!
//! Loaded from `~/.config/vitalview/config.toml` (platform config dir). A
//! missing file yields the defaults; every field is optional.
//!
//! ```toml
//! [viewport]
//! settle_delay_ms = 800
//! default_target = "heart"
//!
//! [chat]
//! endpoint = "http://127.0.0.1:5000/chat"
//!
//! [[targets]]
//! key = "elbow"
//! camera_target = { x = 0.3, y = 1.1, z = 0.0 }
//! camera_orbit = { azimuth_deg = 40.0, polar_deg = 80.0, radius_m = 1.0 }
//! marker_position = { x = 0.32, y = 1.1, z = 0.05 }
//! ```

use crate::error::{Result, VitalViewError};
use crate::target::{DEFAULT_TARGET_KEY, TargetDefinition, TargetRegistry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Assistant text recorded when the chat endpoint cannot be reached.
pub const DEFAULT_ERROR_TEXT: &str = "An error occurred. Please try again.";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    /// Wait after re-aiming the camera when the viewer cannot report completion
    pub settle_delay_ms: u64,
    /// Upper bound on waiting for a viewer-reported completion
    pub settle_timeout_ms: u64,
    /// Overlay offset from the marker's top-left corner, in pixels
    pub popup_offset_x: f32,
    pub popup_offset_y: f32,
    /// Fail construction when a required UI handle is missing
    pub strict_handles: bool,
    /// Region used for unknown targets
    pub default_target: String,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 800,
            settle_timeout_ms: 3_000,
            popup_offset_x: 20.0,
            popup_offset_y: -10.0,
            strict_handles: cfg!(debug_assertions),
            default_target: DEFAULT_TARGET_KEY.to_string(),
        }
    }
}

impl ViewportConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    /// Full URL of the chat endpoint
    pub endpoint: String,
    pub request_timeout_secs: u64,
    /// Assistant text recorded on transport failure
    pub error_text: String,
    /// Recover directive fields from JSON embedded in the reply text
    pub inline_directives: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/chat".to_string(),
            request_timeout_secs: 60,
            error_text: DEFAULT_ERROR_TEXT.to_string(),
            inline_directives: false,
        }
    }
}

impl ChatConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub viewport: ViewportConfig,
    pub chat: ChatConfig,
    /// Regions added to (or overriding) the built-in table
    pub targets: Vec<TargetDefinition>,
}

impl AppConfig {
    /// Returns the default config file location.
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| VitalViewError::config("Could not determine config directory"))?;
        Ok(dir.join("vitalview").join("config.toml"))
    }

    /// Loads the configuration at `path`, or the defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(
                "[AppConfig] No config at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::info!("[AppConfig] Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads from [`AppConfig::default_path`].
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Builds the target registry: the built-in table extended by `targets`.
    pub fn build_registry(&self) -> Result<TargetRegistry> {
        TargetRegistry::with_entries(self.targets.iter().cloned(), &self.viewport.default_target)
    }
}
