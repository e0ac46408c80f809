//! Core trait for the host terminal capability.
//!
//! [`TerminalIo`] bundles every host primitive the bridge needs: the raw
//! mode toggle, geometry and color queries, the input byte stream, the
//! window-change stream and the output stream. Passing it in explicitly
//! (instead of touching process-global handles) lets the bridge run
//! against a fake terminal in tests.

use tokio::sync::mpsc;

use crate::error::Result;
use crate::size::WindowSize;

/// Receiver of raw input chunks, one per host read.
///
/// The channel closes when the host input reaches EOF.
pub type InputReceiver = mpsc::UnboundedReceiver<Vec<u8>>;

/// Receiver of window sizes, one per host geometry change.
pub type ResizeReceiver = mpsc::UnboundedReceiver<WindowSize>;

/// Host terminal primitives.
///
/// Implementations must deliver input chunks and window sizes in the order
/// the host produced them.
pub trait TerminalIo: Send {
    /// Check whether the terminal is currently in raw mode.
    fn is_raw_mode(&self) -> Result<bool>;

    /// Switch the terminal into raw mode.
    fn enable_raw_mode(&mut self) -> Result<()>;

    /// Switch the terminal back to cooked mode.
    fn disable_raw_mode(&mut self) -> Result<()>;

    /// Get the current window size.
    fn size(&self) -> Result<WindowSize>;

    /// Get the color depth in bits (1, 4, 8 or 24).
    fn color_depth(&self) -> u8;

    /// Start delivering input chunks.
    ///
    /// Can be called once; later calls fail with
    /// [`HostError::InputAlreadyStarted`](crate::HostError::InputAlreadyStarted).
    fn start_input(&mut self) -> Result<InputReceiver>;

    /// Start delivering window-change notifications.
    fn watch_resize(&mut self) -> Result<ResizeReceiver>;

    /// Write the whole payload to the output stream and flush it.
    fn write_all(&mut self, data: &[u8]) -> Result<()>;
}

impl<T: TerminalIo + ?Sized> TerminalIo for Box<T> {
    fn is_raw_mode(&self) -> Result<bool> {
        (**self).is_raw_mode()
    }

    fn enable_raw_mode(&mut self) -> Result<()> {
        (**self).enable_raw_mode()
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        (**self).disable_raw_mode()
    }

    fn size(&self) -> Result<WindowSize> {
        (**self).size()
    }

    fn color_depth(&self) -> u8 {
        (**self).color_depth()
    }

    fn start_input(&mut self) -> Result<InputReceiver> {
        (**self).start_input()
    }

    fn watch_resize(&mut self) -> Result<ResizeReceiver> {
        (**self).watch_resize()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        (**self).write_all(data)
    }
}
