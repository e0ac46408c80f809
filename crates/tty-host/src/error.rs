//! Error types for the tty-host crate.
//!
//! This module provides a unified error type [`HostError`] that covers the
//! failure modes of the host terminal primitives.

use std::io;

/// The error type for host terminal operations.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Failed to switch the terminal into raw mode.
    #[error("failed to enable raw mode: {0}")]
    RawMode(#[source] io::Error),

    /// Failed to switch the terminal back to its previous mode.
    #[error("failed to restore terminal mode: {0}")]
    RestoreMode(#[source] io::Error),

    /// Failed to query the terminal geometry.
    #[error("failed to query terminal size: {0}")]
    Size(#[source] io::Error),

    /// Failed to start the input reader.
    #[error("failed to start input reader: {0}")]
    Input(#[source] io::Error),

    /// The input stream was already handed out.
    #[error("input stream has already been started")]
    InputAlreadyStarted,

    /// Failed to register a signal handler.
    #[error("failed to register signal handler: {0}")]
    Signal(#[source] io::Error),

    /// An I/O error occurred on the terminal streams.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// The output stream has been closed.
    #[error("terminal output has been closed")]
    Closed,
}

impl HostError {
    /// Check whether the error means the output stream is gone for good.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match self {
            Self::Closed => true,
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::BrokenPipe | io::ErrorKind::UnexpectedEof | io::ErrorKind::WriteZero
            ),
            _ => false,
        }
    }
}

/// A specialized Result type for host terminal operations.
pub type Result<T> = std::result::Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = HostError::Closed;
        assert_eq!(err.to_string(), "terminal output has been closed");
    }

    #[test]
    fn error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe");
        let err: HostError = io_err.into();
        assert!(matches!(err, HostError::Io(_)));
        assert!(err.is_closed());
    }

    #[test]
    fn raw_mode_is_not_closed() {
        let err = HostError::RawMode(io::Error::other("not a tty"));
        assert!(!err.is_closed());
        assert!(err.to_string().starts_with("failed to enable raw mode"));
    }
}
