//! tty-bridge: terminal input/output bridge for message-passing applications
//!
//! This crate adapts a host terminal (raw byte input, window-change signals,
//! byte output) into a few discrete, ordered messages exchanged with an
//! application that never touches the terminal itself.
//!
//! # Features
//!
//! - **Raw mode lifecycle**: raw mode for the whole life of the bridge,
//!   prior mode restored on termination or drop
//! - **Two decoding modes**: verbatim pass-through or structured key events
//!   with modifiers
//! - **Resize notifications**: one event per host signal, exact values
//! - **Ordered output**: synchronous writes, concatenated in request order
//! - **Explicit interrupt policy**: host-handled Escape/Ctrl-C or delegated
//!   to the application
//! - **Fake terminal** for tests (feature: `test-utils`)
//!
//! # Example
//!
//! ```ignore
//! use tty_bridge::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> tty_bridge::Result<()> {
//!     let config = BridgeConfig::load("bridge.toml")?;
//!     let config = EnvConfig::default().apply(config)?;
//!     tty_bridge::logging::init(&config.logging)?;
//!
//!     let (mut app, ports) = tty_bridge::connect();
//!     let bridge = BridgeBuilder::native().config(&config).ports(ports).build()?;
//!
//!     tokio::spawn(async move {
//!         while let Some(event) = app.input.recv().await {
//!             if let Some(text) = event.as_text() {
//!                 let _ = app.write(text.to_uppercase());
//!             }
//!         }
//!     });
//!
//!     bridge.run_and_exit().await;
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod decode;
pub mod error;
pub mod event;
pub mod logging;
pub mod mode;
pub mod policy;
pub mod ports;
pub mod prelude;
pub mod resize;
pub mod writer;

/// Test utilities (fake terminal).
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use bridge::{Bridge, BridgeBuilder, BridgeExit, ExitReason, FATAL_EXIT_CODE};
pub use config::env::EnvConfig;
pub use config::{BridgeConfig, BridgeMode, Decoding, InterruptPolicy, LogFormat, LoggingConfig};
pub use decode::InputDecoder;
pub use error::{BridgeError, Result};
pub use event::{
    ExitRequest, InitFlags, InputEvent, KeyEvent, Modifiers, OutputRequest, ResizeEvent,
    TerminalSnapshot,
};
pub use mode::ModeController;
pub use policy::{InterruptGate, InterruptKey, Verdict};
pub use ports::{AppPorts, AppStreams, BridgePorts, connect};
pub use resize::ResizeNotifier;
pub use writer::OutputWriter;

pub use tty_host::{NativeTerminal, TerminalIo, WindowSize};
