//! Logging setup.
//!
//! The bridge only emits `tracing` events; installing a subscriber is up
//! to the embedding program. [`init`] installs a `tracing-subscriber`
//! stack driven by [`LoggingConfig`]. Logs go to stderr or a file, never
//! to stdout, which carries the terminal output.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{BridgeError, Result};

/// Parse the filter directive of a logging configuration.
pub fn filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.level).map_err(|e| BridgeError::Logging {
        message: format!("invalid log filter '{}': {e}", config.level),
    })
}

/// Install the global subscriber.
///
/// Fails if the filter is invalid, the log file cannot be opened, or a
/// global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = filter(config)?;

    let (writer, ansi) = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);
    let layer = match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| BridgeError::Logging {
            message: e.to_string(),
        })
}
