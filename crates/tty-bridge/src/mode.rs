//! Terminal mode lifecycle.
//!
//! The [`ModeController`] owns the host terminal and its raw/cooked
//! toggle. Activation switches the terminal to raw mode, starts the host
//! input stream and captures a [`TerminalSnapshot`]. There is no public
//! way to leave raw mode while the controller is active: the prior mode is
//! put back by [`ModeController::restore`] when the bridge terminates, or
//! by `Drop` for a controller that is never explicitly restored.

use tracing::{debug, warn};
use tty_host::{InputReceiver, TerminalIo, WindowSize};

use crate::event::TerminalSnapshot;

#[derive(Debug)]
enum ModeState {
    Inactive,
    Active {
        /// Raw mode flag observed before activation.
        prior_raw: bool,
        snapshot: TerminalSnapshot,
    },
}

/// Owner of the terminal mode toggle.
pub struct ModeController<T: TerminalIo> {
    terminal: T,
    state: ModeState,
    input: Option<InputReceiver>,
}

impl<T: TerminalIo> ModeController<T> {
    /// Wrap a terminal. Nothing is changed until [`activate`](Self::activate).
    pub const fn new(terminal: T) -> Self {
        Self {
            terminal,
            state: ModeState::Inactive,
            input: None,
        }
    }

    /// Enter raw mode, start input and capture the terminal snapshot.
    ///
    /// Calling this on an active controller returns the snapshot captured
    /// by the first call and changes nothing. If starting input fails the
    /// raw mode change is rolled back before the error is returned.
    pub fn activate(&mut self) -> tty_host::Result<TerminalSnapshot> {
        if let ModeState::Active { snapshot, .. } = self.state {
            debug!("Terminal already active");
            return Ok(snapshot);
        }

        let prior_raw = self.terminal.is_raw_mode()?;
        if !prior_raw {
            self.terminal.enable_raw_mode()?;
        }

        let input = match self.terminal.start_input() {
            Ok(input) => input,
            Err(e) => {
                self.rollback(prior_raw);
                return Err(e);
            }
        };

        let size = self.terminal.size().unwrap_or_else(|e| {
            warn!(error = %e, "Could not query terminal size, using defaults");
            WindowSize::default()
        });
        let snapshot = TerminalSnapshot::new(self.terminal.color_depth(), size.cols, size.rows);

        debug!(
            prior_raw,
            color_depth = snapshot.color_depth,
            columns = snapshot.columns,
            rows = snapshot.rows,
            "Terminal activated"
        );

        self.input = Some(input);
        self.state = ModeState::Active {
            prior_raw,
            snapshot,
        };
        Ok(snapshot)
    }

    /// Put the terminal back into the mode it had before activation.
    ///
    /// Does nothing on an inactive controller.
    pub fn restore(&mut self) -> tty_host::Result<()> {
        let ModeState::Active { prior_raw, .. } = self.state else {
            return Ok(());
        };
        self.state = ModeState::Inactive;
        if !prior_raw {
            self.terminal.disable_raw_mode()?;
        }
        debug!(prior_raw, "Terminal restored");
        Ok(())
    }

    fn rollback(&mut self, prior_raw: bool) {
        if prior_raw {
            return;
        }
        if let Err(e) = self.terminal.disable_raw_mode() {
            warn!(error = %e, "Failed to roll back raw mode");
        }
    }

    /// Check whether the controller is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, ModeState::Active { .. })
    }

    /// The snapshot captured at activation.
    #[must_use]
    pub const fn snapshot(&self) -> Option<TerminalSnapshot> {
        match self.state {
            ModeState::Active { snapshot, .. } => Some(snapshot),
            ModeState::Inactive => None,
        }
    }

    /// Take the host input stream started by activation.
    pub const fn take_input(&mut self) -> Option<InputReceiver> {
        self.input.take()
    }

    /// The underlying terminal.
    pub const fn terminal(&self) -> &T {
        &self.terminal
    }

    /// The underlying terminal, mutably.
    pub const fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }
}

impl<T: TerminalIo> Drop for ModeController<T> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "Failed to restore terminal mode");
        }
    }
}

impl<T: TerminalIo> std::fmt::Debug for ModeController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeController")
            .field("state", &self.state)
            .field("input_pending", &self.input.is_some())
            .finish_non_exhaustive()
    }
}
