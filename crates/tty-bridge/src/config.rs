//! Configuration types for tty-bridge.
//!
//! A [`BridgeConfig`] fixes the decoding mode and interrupt policy for the
//! lifetime of a bridge, plus the logging setup. It can be built in code,
//! loaded from a TOML or JSON file ([`file`]) and overridden from the
//! environment ([`env`]).

pub mod env;
pub mod file;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Default log filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// How raw input bytes are turned into [`InputEvent`](crate::InputEvent)s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decoding {
    /// Forward each input chunk verbatim as text.
    #[default]
    RawPassthrough,
    /// Interpret input as named key presses with modifiers.
    Structured,
}

impl FromStr for Decoding {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" | "passthrough" | "raw-passthrough" => Ok(Self::RawPassthrough),
            "structured" | "keys" => Ok(Self::Structured),
            other => Err(BridgeError::config(format!("unknown decoding mode '{other}'"))),
        }
    }
}

impl fmt::Display for Decoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RawPassthrough => f.write_str("raw-passthrough"),
            Self::Structured => f.write_str("structured"),
        }
    }
}

/// Who is responsible for Escape and Ctrl-C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterruptPolicy {
    /// The bridge exits the process with code 0 when a chunk is exactly
    /// Escape or Ctrl-C.
    #[default]
    HostHandled,
    /// Every byte is forwarded; the application decides when to exit.
    DelegateToApplication,
}

impl FromStr for InterruptPolicy {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "host" | "host-handled" => Ok(Self::HostHandled),
            "delegate" | "application" | "delegate-to-application" => {
                Ok(Self::DelegateToApplication)
            }
            other => Err(BridgeError::config(format!(
                "unknown interrupt policy '{other}'"
            ))),
        }
    }
}

impl fmt::Display for InterruptPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostHandled => f.write_str("host-handled"),
            Self::DelegateToApplication => f.write_str("delegate-to-application"),
        }
    }
}

/// The behavior of a bridge, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BridgeMode {
    /// Input decoding mode.
    pub decoding: Decoding,
    /// Interrupt handling policy.
    pub interrupt: InterruptPolicy,
}

impl BridgeMode {
    /// Create a mode.
    #[must_use]
    pub const fn new(decoding: Decoding, interrupt: InterruptPolicy) -> Self {
        Self {
            decoding,
            interrupt,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human readable output.
    Pretty,
    /// Single-line human readable output.
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(BridgeError::config(format!("unknown log format '{other}'"))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Compact => f.write_str("compact"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Logging configuration.
///
/// Logs never go to stdout, which belongs to the terminal stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`tracing_subscriber::EnvFilter` syntax).
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// Log file; stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter directive.
    #[must_use]
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the output format.
    #[must_use]
    pub const fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Log to a file instead of stderr.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }
}

/// Complete bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Input decoding mode.
    pub decoding: Decoding,
    /// Interrupt handling policy.
    pub interrupt: InterruptPolicy,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Create a configuration with defaults (pass-through, host-handled).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the decoding mode.
    #[must_use]
    pub const fn decoding(mut self, decoding: Decoding) -> Self {
        self.decoding = decoding;
        self
    }

    /// Set the interrupt policy.
    #[must_use]
    pub const fn interrupt(mut self, interrupt: InterruptPolicy) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// The bridge mode part of this configuration.
    #[must_use]
    pub const fn mode(&self) -> BridgeMode {
        BridgeMode::new(self.decoding, self.interrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BridgeConfig::new();
        assert_eq!(config.decoding, Decoding::RawPassthrough);
        assert_eq!(config.interrupt, InterruptPolicy::HostHandled);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn parse_decoding() {
        assert_eq!("raw".parse::<Decoding>().unwrap(), Decoding::RawPassthrough);
        assert_eq!(" Structured ".parse::<Decoding>().unwrap(), Decoding::Structured);
        assert!("bytes".parse::<Decoding>().unwrap_err().is_config());
    }

    #[test]
    fn parse_log_format() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" COMPACT ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().unwrap_err().is_config());
        assert_eq!(LogFormat::Pretty.to_string(), "pretty");
    }

    #[test]
    fn parse_interrupt_policy() {
        assert_eq!(
            "host".parse::<InterruptPolicy>().unwrap(),
            InterruptPolicy::HostHandled
        );
        assert_eq!(
            "delegate-to-application".parse::<InterruptPolicy>().unwrap(),
            InterruptPolicy::DelegateToApplication
        );
        assert!("never".parse::<InterruptPolicy>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for decoding in [Decoding::RawPassthrough, Decoding::Structured] {
            assert_eq!(decoding.to_string().parse::<Decoding>().unwrap(), decoding);
        }
    }

    #[test]
    fn builder_methods() {
        let config = BridgeConfig::new()
            .decoding(Decoding::Structured)
            .interrupt(InterruptPolicy::DelegateToApplication)
            .logging(LoggingConfig::new().level("debug").format(LogFormat::Json));

        assert_eq!(
            config.mode(),
            BridgeMode::new(Decoding::Structured, InterruptPolicy::DelegateToApplication)
        );
        assert_eq!(config.logging.format, LogFormat::Json);
    }
}
