//! File-based configuration loading.

use std::path::Path;

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};

/// Configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Detect format from path.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl BridgeConfig {
    /// Parse a TOML document.
    ///
    /// ```toml
    /// decoding = "structured"
    /// interrupt = "delegate-to-application"
    ///
    /// [logging]
    /// level = "tty_bridge=debug"
    /// format = "json"
    /// file = "/tmp/bridge.log"
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parse a JSON document with the same shape as the TOML form.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| BridgeError::config(format!("invalid JSON configuration: {e}")))
    }

    /// Load a configuration file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            BridgeError::config(format!(
                "unsupported configuration file type: {}",
                path.display()
            ))
        })?;
        let contents = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), ?format, "loading bridge configuration");

        match format {
            ConfigFormat::Toml => Self::from_toml_str(&contents),
            ConfigFormat::Json => Self::from_json_str(&contents),
        }
    }
}
