//! Error types for tty-bridge.
//!
//! Configuration mistakes are reported by the builder before any terminal
//! state is touched; host failures during setup abort construction; a dead
//! output stream ends a running bridge.

use thiserror::Error;
use tty_host::HostError;

/// The main error type for bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Invalid or conflicting configuration.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// The host terminal failed during setup.
    #[error("terminal setup failed: {0}")]
    Host(#[from] HostError),

    /// The output stream failed; the bridge cannot continue.
    #[error("output stream closed: {source}")]
    OutputClosed {
        /// The underlying host error.
        #[source]
        source: HostError,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Logging could not be initialised.
    #[error("failed to initialise logging: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an output-closed error.
    #[must_use]
    pub const fn output_closed(source: HostError) -> Self {
        Self::OutputClosed { source }
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Toml(_))
    }

    /// Check if this error ends a running bridge.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::OutputClosed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = BridgeError::config("input subscriber registered twice");
        assert_eq!(
            err.to_string(),
            "configuration error: input subscriber registered twice"
        );
        assert!(err.is_config());
        assert!(!err.is_fatal());
    }

    #[test]
    fn host_error_converts() {
        let err: BridgeError = HostError::RawMode(std::io::Error::other("not a tty")).into();
        assert!(matches!(err, BridgeError::Host(HostError::RawMode(_))));
        assert!(!err.is_config());
    }

    #[test]
    fn output_closed_is_fatal() {
        let err = BridgeError::output_closed(HostError::Closed);
        assert!(err.is_fatal());
        assert!(err.to_string().contains("terminal output has been closed"));
    }
}
