//! Fake host terminal for unit testing.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tty_host::{HostError, InputReceiver, ResizeReceiver, TerminalIo, WindowSize};

/// State shared between a [`FakeTerminal`] and its handles.
#[derive(Debug)]
struct Shared {
    raw: bool,
    raw_enable_count: usize,
    fail_raw_mode: bool,
    fail_restore: bool,
    size: WindowSize,
    output: Vec<u8>,
    output_closed: bool,
    input_tx: Option<mpsc::UnboundedSender<Vec<u8>>>,
    resize_tx: Option<mpsc::UnboundedSender<WindowSize>>,
    input_started: bool,
    resize_watched: bool,
}

/// Builder for [`FakeTerminal`].
#[derive(Debug, Clone)]
pub struct FakeTerminalBuilder {
    size: WindowSize,
    color_depth: u8,
    raw: bool,
    fail_raw_mode: bool,
    fail_restore: bool,
    fail_input: bool,
    fail_resize: bool,
}

impl Default for FakeTerminalBuilder {
    fn default() -> Self {
        Self {
            size: WindowSize::default(),
            color_depth: tty_host::color::COLORS_256,
            raw: false,
            fail_raw_mode: false,
            fail_restore: false,
            fail_input: false,
            fail_resize: false,
        }
    }
}

impl FakeTerminalBuilder {
    /// Set the initial window size.
    #[must_use]
    pub const fn size(mut self, cols: u16, rows: u16) -> Self {
        self.size = WindowSize::new(cols, rows);
        self
    }

    /// Set the reported color depth.
    #[must_use]
    pub const fn color_depth(mut self, depth: u8) -> Self {
        self.color_depth = depth;
        self
    }

    /// Start with raw mode already enabled.
    #[must_use]
    pub const fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Make enabling raw mode fail.
    #[must_use]
    pub const fn fail_raw_mode(mut self) -> Self {
        self.fail_raw_mode = true;
        self
    }

    /// Make leaving raw mode fail.
    #[must_use]
    pub const fn fail_restore(mut self) -> Self {
        self.fail_restore = true;
        self
    }

    /// Make starting input fail.
    #[must_use]
    pub const fn fail_input(mut self) -> Self {
        self.fail_input = true;
        self
    }

    /// Make the resize watcher fail to start.
    #[must_use]
    pub const fn fail_resize(mut self) -> Self {
        self.fail_resize = true;
        self
    }

    /// Build the terminal and its control handle.
    #[must_use]
    pub fn build(self) -> (FakeTerminal, FakeTerminalHandle) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (resize_tx, resize_rx) = mpsc::unbounded_channel();

        let shared = Arc::new(Mutex::new(Shared {
            raw: self.raw,
            raw_enable_count: 0,
            fail_raw_mode: self.fail_raw_mode,
            fail_restore: self.fail_restore,
            size: self.size,
            output: Vec::new(),
            output_closed: false,
            input_tx: Some(input_tx),
            resize_tx: Some(resize_tx),
            input_started: false,
            resize_watched: false,
        }));

        let terminal = FakeTerminal {
            shared: Arc::clone(&shared),
            color_depth: self.color_depth,
            input_rx: Some(input_rx),
            resize_rx: Some(resize_rx),
            fail_input: self.fail_input,
            fail_resize: self.fail_resize,
        };
        (terminal, FakeTerminalHandle { shared })
    }
}

/// A fake terminal for testing.
///
/// Input chunks and window sizes pushed through the paired
/// [`FakeTerminalHandle`] before the bridge starts are buffered and
/// delivered once it does.
#[derive(Debug)]
pub struct FakeTerminal {
    shared: Arc<Mutex<Shared>>,
    color_depth: u8,
    input_rx: Option<InputReceiver>,
    resize_rx: Option<ResizeReceiver>,
    fail_input: bool,
    fail_resize: bool,
}

impl FakeTerminal {
    /// Create a cooked 80x24 terminal with 256 colors.
    #[must_use]
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Self, FakeTerminalHandle) {
        Self::builder().build()
    }

    /// Start configuring a fake terminal.
    #[must_use]
    pub fn builder() -> FakeTerminalBuilder {
        FakeTerminalBuilder::default()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TerminalIo for FakeTerminal {
    fn is_raw_mode(&self) -> tty_host::Result<bool> {
        Ok(self.lock().raw)
    }

    fn enable_raw_mode(&mut self) -> tty_host::Result<()> {
        let mut shared = self.lock();
        if shared.fail_raw_mode {
            return Err(HostError::RawMode(io::Error::other("not a terminal")));
        }
        shared.raw = true;
        shared.raw_enable_count += 1;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> tty_host::Result<()> {
        let mut shared = self.lock();
        if shared.fail_restore {
            return Err(HostError::RestoreMode(io::Error::other("tty gone")));
        }
        shared.raw = false;
        Ok(())
    }

    fn size(&self) -> tty_host::Result<WindowSize> {
        Ok(self.lock().size)
    }

    fn color_depth(&self) -> u8 {
        self.color_depth
    }

    fn start_input(&mut self) -> tty_host::Result<InputReceiver> {
        if self.fail_input {
            return Err(HostError::Input(io::Error::other("stdin unavailable")));
        }
        let rx = self.input_rx.take().ok_or(HostError::InputAlreadyStarted)?;
        self.lock().input_started = true;
        Ok(rx)
    }

    fn watch_resize(&mut self) -> tty_host::Result<ResizeReceiver> {
        if self.fail_resize {
            return Err(HostError::Signal(io::Error::other("signal registration failed")));
        }
        let rx = self
            .resize_rx
            .take()
            .ok_or_else(|| HostError::Signal(io::Error::other("resize already watched")))?;
        self.lock().resize_watched = true;
        Ok(rx)
    }

    #[allow(clippy::significant_drop_tightening)]
    fn write_all(&mut self, data: &[u8]) -> tty_host::Result<()> {
        let mut shared = self.lock();
        if shared.output_closed {
            return Err(HostError::Closed);
        }
        shared.output.extend_from_slice(data);
        Ok(())
    }
}

/// Test-side control of a [`FakeTerminal`].
#[derive(Debug, Clone)]
pub struct FakeTerminalHandle {
    shared: Arc<Mutex<Shared>>,
}

impl FakeTerminalHandle {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver one input chunk, as a single host read would.
    ///
    /// Returns `false` once input has been closed or its receiver dropped.
    pub fn send_input(&self, chunk: impl AsRef<[u8]>) -> bool {
        self.lock()
            .input_tx
            .as_ref()
            .is_some_and(|tx| tx.send(chunk.as_ref().to_vec()).is_ok())
    }

    /// Signal EOF on the input stream.
    pub fn close_input(&self) {
        self.lock().input_tx = None;
    }

    /// Change the window size and raise a resize signal.
    pub fn resize(&self, cols: u16, rows: u16) -> bool {
        let size = WindowSize::new(cols, rows);
        let mut shared = self.lock();
        shared.size = size;
        shared
            .resize_tx
            .as_ref()
            .is_some_and(|tx| tx.send(size).is_ok())
    }

    /// Stop the resize stream.
    pub fn close_resize(&self) {
        self.lock().resize_tx = None;
    }

    /// Change the window size without raising a signal.
    pub fn set_size(&self, cols: u16, rows: u16) {
        self.lock().size = WindowSize::new(cols, rows);
    }

    /// Make every later write fail.
    pub fn close_output(&self) {
        self.lock().output_closed = true;
    }

    /// Everything written so far.
    #[must_use]
    pub fn output(&self) -> Vec<u8> {
        self.lock().output.clone()
    }

    /// Everything written so far, as text.
    #[must_use]
    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output()).into_owned()
    }

    /// Check whether the terminal is in raw mode.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.lock().raw
    }

    /// How many times raw mode was switched on.
    #[must_use]
    pub fn raw_enable_count(&self) -> usize {
        self.lock().raw_enable_count
    }

    /// Check whether input delivery was started.
    #[must_use]
    pub fn input_started(&self) -> bool {
        self.lock().input_started
    }

    /// Check whether the resize watcher was started.
    #[must_use]
    pub fn resize_watched(&self) -> bool {
        self.lock().resize_watched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_terminal_defaults() {
        let (terminal, handle) = FakeTerminal::new();
        assert!(!terminal.is_raw_mode().unwrap());
        assert_eq!(terminal.size().unwrap(), WindowSize::new(80, 24));
        assert_eq!(terminal.color_depth(), 8);
        assert!(!handle.input_started());
    }

    #[tokio::test]
    async fn input_is_buffered_until_started() {
        let (mut terminal, handle) = FakeTerminal::new();
        assert!(handle.send_input(b"ab"));
        handle.close_input();

        let mut rx = terminal.start_input().unwrap();
        assert_eq!(rx.recv().await, Some(b"ab".to_vec()));
        assert_eq!(rx.recv().await, None);
        assert!(matches!(
            terminal.start_input(),
            Err(HostError::InputAlreadyStarted)
        ));
    }

    #[tokio::test]
    async fn resize_updates_size_and_signals() {
        let (mut terminal, handle) = FakeTerminal::new();
        let mut rx = terminal.watch_resize().unwrap();
        assert!(handle.resize(132, 43));
        assert_eq!(rx.recv().await, Some(WindowSize::new(132, 43)));
        assert_eq!(terminal.size().unwrap(), WindowSize::new(132, 43));
    }

    #[test]
    fn closed_output_rejects_writes() {
        let (mut terminal, handle) = FakeTerminal::new();
        terminal.write_all(b"ok").unwrap();
        handle.close_output();
        let err = terminal.write_all(b"lost").unwrap_err();
        assert!(err.is_closed());
        assert_eq!(handle.output_str(), "ok");
    }
}
