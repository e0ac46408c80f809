//! The native host terminal.
//!
//! Raw mode and geometry come from crossterm, input from a stdin reader
//! thread, window changes from SIGWINCH (Unix only) and output goes to the
//! process's stdout.

use std::io::{self, Write};

use crossterm::terminal;

use crate::color;
use crate::error::{HostError, Result};
use crate::reader;
use crate::size::WindowSize;
use crate::traits::{InputReceiver, ResizeReceiver, TerminalIo};

/// The terminal attached to the current process.
#[derive(Debug)]
pub struct NativeTerminal {
    stdout: io::Stdout,
    input_started: bool,
    /// Raw mode was switched on through this handle and not yet switched off.
    raw_enabled: bool,
    #[cfg(unix)]
    resize_watcher: Option<crate::signals::SignalHandle>,
}

impl NativeTerminal {
    /// Create a handle to the process terminal.
    ///
    /// Nothing is touched until one of the [`TerminalIo`] methods is called.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            input_started: false,
            raw_enabled: false,
            #[cfg(unix)]
            resize_watcher: None,
        }
    }
}

impl Default for NativeTerminal {
    fn default() -> Self {
        Self::new()
    }
}

/// Query the terminal size, falling back to `COLUMNS`/`LINES`.
#[must_use]
pub fn current_size() -> WindowSize {
    match terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => WindowSize::new(cols, rows),
        Ok(_) => WindowSize::from_env(),
        Err(e) => {
            tracing::debug!(error = %e, "terminal size unavailable, using environment");
            WindowSize::from_env()
        }
    }
}

impl TerminalIo for NativeTerminal {
    fn is_raw_mode(&self) -> Result<bool> {
        terminal::is_raw_mode_enabled().map_err(HostError::Io)
    }

    fn enable_raw_mode(&mut self) -> Result<()> {
        terminal::enable_raw_mode().map_err(HostError::RawMode)?;
        self.raw_enabled = true;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        terminal::disable_raw_mode().map_err(HostError::RestoreMode)?;
        self.raw_enabled = false;
        Ok(())
    }

    fn size(&self) -> Result<WindowSize> {
        Ok(current_size())
    }

    fn color_depth(&self) -> u8 {
        color::detect_color_depth()
    }

    fn start_input(&mut self) -> Result<InputReceiver> {
        if self.input_started {
            return Err(HostError::InputAlreadyStarted);
        }
        let rx = reader::spawn_stdin_reader().map_err(HostError::Input)?;
        self.input_started = true;
        Ok(rx)
    }

    #[cfg(unix)]
    fn watch_resize(&mut self) -> Result<ResizeReceiver> {
        let (rx, handle) =
            crate::signals::watch_window_size(current_size).map_err(HostError::Signal)?;
        self.resize_watcher = Some(handle);
        Ok(rx)
    }

    #[cfg(not(unix))]
    fn watch_resize(&mut self) -> Result<ResizeReceiver> {
        // Resize detection is not supported here; the stream ends immediately.
        let (_tx, rx) = tokio::sync::mpsc::unbounded_channel();
        Ok(rx)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let mut out = self.stdout.lock();
        out.write_all(data)?;
        out.flush()?;
        Ok(())
    }
}

impl Drop for NativeTerminal {
    fn drop(&mut self) {
        if self.raw_enabled {
            let _ = terminal::disable_raw_mode();
        }
    }
}
