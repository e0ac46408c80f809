//! Output serialization.
//!
//! [`OutputWriter`] hands each [`OutputRequest`] to the host output stream
//! in full and flushes it before returning, so requests `w1..wn` produce
//! exactly `w1 ++ ... ++ wn` on the terminal. Any write failure is fatal.

use tracing::{error, trace};
use tty_host::TerminalIo;

use crate::error::{BridgeError, Result};
use crate::event::OutputRequest;

/// Synchronous, ordered writer to the host output stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputWriter {
    writes: u64,
    bytes: u64,
}

impl OutputWriter {
    /// Create a new writer.
    #[must_use]
    pub const fn new() -> Self {
        Self { writes: 0, bytes: 0 }
    }

    /// Write one request and flush.
    ///
    /// Empty payloads are skipped. A host failure is returned as
    /// [`BridgeError::OutputClosed`].
    pub fn write<T: TerminalIo + ?Sized>(
        &mut self,
        terminal: &mut T,
        request: &OutputRequest,
    ) -> Result<()> {
        if request.is_empty() {
            return Ok(());
        }

        terminal.write_all(request.as_bytes()).map_err(|e| {
            error!(error = %e, len = request.len(), "Terminal write failed");
            BridgeError::output_closed(e)
        })?;

        self.writes += 1;
        self.bytes += request.len() as u64;
        trace!(len = request.len(), "Wrote output");
        Ok(())
    }

    /// Number of requests written.
    #[must_use]
    pub const fn writes(&self) -> u64 {
        self.writes
    }

    /// Number of bytes written.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.bytes
    }
}
