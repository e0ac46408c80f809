//! Test utilities for tty-bridge.
//!
//! [`FakeTerminal`] stands in for the host terminal so a bridge can be
//! driven end to end without a TTY: the test feeds input chunks and resize
//! signals through a [`FakeTerminalHandle`] and reads back what the bridge
//! wrote and which mode it left the terminal in.

mod fake_terminal;

pub use fake_terminal::{FakeTerminal, FakeTerminalBuilder, FakeTerminalHandle};
