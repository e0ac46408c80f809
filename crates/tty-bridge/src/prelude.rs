//! Convenient re-exports for building a bridge.
//!
//! ```ignore
//! use tty_bridge::prelude::*;
//! ```

pub use crate::bridge::{Bridge, BridgeBuilder, BridgeExit, ExitReason};
pub use crate::config::env::EnvConfig;
pub use crate::config::{BridgeConfig, Decoding, InterruptPolicy};
pub use crate::error::{BridgeError, Result};
pub use crate::event::{
    ExitRequest, InitFlags, InputEvent, KeyEvent, Modifiers, OutputRequest, ResizeEvent,
    TerminalSnapshot,
};
pub use crate::ports::{AppPorts, BridgePorts, connect};
pub use tty_host::{NativeTerminal, TerminalIo};
