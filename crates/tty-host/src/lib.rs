//! tty-host: host terminal primitives
//!
//! This crate exposes the few host terminal primitives a terminal bridge
//! needs (raw mode, geometry, color depth, a stream of input chunks, a
//! stream of window-size changes and a synchronous output stream) behind a
//! single injectable trait, [`TerminalIo`].
//!
//! # Platform Support
//!
//! - **Unix**: raw mode and geometry via crossterm, window changes via
//!   SIGWINCH (`signal-hook`).
//! - **Windows**: raw mode and geometry via crossterm; window changes are
//!   not reported.
//!
//! # Quick Start
//!
//! ```ignore
//! use tty_host::{NativeTerminal, TerminalIo};
//!
//! let mut term = NativeTerminal::new();
//! term.enable_raw_mode()?;
//! let mut input = term.start_input()?;
//! while let Some(chunk) = input.recv().await {
//!     term.write_all(&chunk)?;
//! }
//! ```

pub mod color;
pub mod error;
pub mod native;
pub mod reader;
pub mod size;
pub mod traits;

#[cfg(unix)]
pub mod signals;

pub use color::{color_depth_from, detect_color_depth};
pub use error::{HostError, Result};
pub use native::NativeTerminal;
pub use size::WindowSize;
pub use traits::{InputReceiver, ResizeReceiver, TerminalIo};
