//! Environment-based configuration.

use std::collections::HashMap;

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};

/// Environment configuration prefix.
pub const DEFAULT_PREFIX: &str = "TTY_BRIDGE";

/// Common environment variables (without prefix).
pub mod vars {
    /// Decoding mode (`raw` or `structured`).
    pub const DECODING: &str = "DECODING";
    /// Interrupt policy (`host` or `delegate`).
    pub const INTERRUPT: &str = "INTERRUPT";
    /// Log filter directive.
    pub const LOG: &str = "LOG";
    /// Log format (`pretty`, `compact` or `json`).
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// Log file path.
    pub const LOG_FILE: &str = "LOG_FILE";
}

/// Environment variable reader.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Prefix for environment variables.
    prefix: String,
    /// Fixed values used instead of the process environment.
    fixed: Option<HashMap<String, String>>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl EnvConfig {
    /// Create a reader over the process environment.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            fixed: None,
        }
    }

    /// Create a reader over a fixed set of variables.
    ///
    /// Keys are full variable names, prefix included.
    #[must_use]
    pub fn from_vars<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            fixed: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Build the full environment variable name.
    fn var_name(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_uppercase()
        } else {
            format!("{}_{}", self.prefix, name.to_uppercase())
        }
    }

    /// Get a string value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        let var_name = self.var_name(name);
        match &self.fixed {
            Some(vars) => vars.get(&var_name).cloned(),
            None => std::env::var(&var_name).ok(),
        }
    }

    /// Get a parsed value; unparsable values are configuration errors.
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
    {
        self.get(name)
            .map(|value| {
                value.parse().map_err(|_| {
                    BridgeError::config(format!(
                        "invalid value '{value}' for {}",
                        self.var_name(name)
                    ))
                })
            })
            .transpose()
    }

    /// Check if a variable is set.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Apply every set variable on top of `config`.
    pub fn apply(&self, mut config: BridgeConfig) -> Result<BridgeConfig> {
        if let Some(decoding) = self.parse(vars::DECODING)? {
            config.decoding = decoding;
        }
        if let Some(interrupt) = self.parse(vars::INTERRUPT)? {
            config.interrupt = interrupt;
        }
        if let Some(level) = self.get(vars::LOG) {
            config.logging.level = level;
        }
        if let Some(format) = self.parse(vars::LOG_FORMAT)? {
            config.logging.format = format;
        }
        if let Some(file) = self.get(vars::LOG_FILE) {
            config.logging.file = Some(file.into());
        }
        Ok(config)
    }
}
