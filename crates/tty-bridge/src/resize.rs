//! Resize notification.
//!
//! The [`ResizeNotifier`] turns host window-size changes into
//! [`ResizeEvent`]s. Every host signal yields exactly one event carrying
//! the size read at that signal; events are never coalesced or reordered.

use tracing::{debug, trace};
use tty_host::{ResizeReceiver, TerminalIo};

use crate::event::ResizeEvent;

/// Source of [`ResizeEvent`]s.
#[derive(Debug)]
pub struct ResizeNotifier {
    rx: ResizeReceiver,
    delivered: u64,
}

impl ResizeNotifier {
    /// Start the host resize watcher.
    pub fn start<T: TerminalIo + ?Sized>(terminal: &mut T) -> tty_host::Result<Self> {
        let rx = terminal.watch_resize()?;
        debug!("Resize watcher started");
        Ok(Self::from_receiver(rx))
    }

    /// Wrap an existing window-size receiver.
    #[must_use]
    pub const fn from_receiver(rx: ResizeReceiver) -> Self {
        Self { rx, delivered: 0 }
    }

    /// Wait for the next resize.
    ///
    /// Returns `None` once the host stops reporting resizes.
    pub async fn next(&mut self) -> Option<ResizeEvent> {
        let size = self.rx.recv().await?;
        self.delivered += 1;
        trace!(cols = size.cols, rows = size.rows, "Window resized");
        Some(ResizeEvent::from(size))
    }

    /// Number of events delivered so far.
    #[must_use]
    pub const fn delivered(&self) -> u64 {
        self.delivered
    }
}
