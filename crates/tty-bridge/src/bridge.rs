//! The bridge run loop.
//!
//! A [`Bridge`] owns the host terminal for its whole life. It routes four
//! sources on a single task:
//!
//! - host input chunks, through the interrupt gate and the decoder, to the
//!   application's input channel
//! - host window changes, as [`ResizeEvent`]s, to the resize channel
//! - application [`OutputRequest`]s to the terminal
//! - application [`ExitRequest`]s, which end the run
//!
//! # Example
//!
//! ```ignore
//! use tty_bridge::{Bridge, BridgeConfig, Decoding, InterruptPolicy, NativeTerminal};
//!
//! #[tokio::main]
//! async fn main() -> tty_bridge::Result<()> {
//!     let (app, ports) = tty_bridge::connect();
//!     let bridge = Bridge::builder(NativeTerminal::new())
//!         .decoding(Decoding::Structured)
//!         .interrupt(InterruptPolicy::DelegateToApplication)
//!         .ports(ports)
//!         .build()?;
//!
//!     tokio::spawn(my_app(bridge.init_flags(), app));
//!     bridge.run_and_exit().await;
//!     Ok(())
//! }
//! ```

mod builder;

pub use builder::BridgeBuilder;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, trace, warn};
use tty_host::{InputReceiver, TerminalIo};

use crate::config::BridgeMode;
use crate::decode::InputDecoder;
use crate::error::Result;
use crate::event::{ExitRequest, InitFlags, InputEvent, OutputRequest, ResizeEvent, TerminalSnapshot};
use crate::mode::ModeController;
use crate::policy::{INTERRUPT_EXIT_CODE, InterruptGate, InterruptKey, Verdict};
use crate::resize::ResizeNotifier;
use crate::writer::OutputWriter;

/// Exit code used when the bridge cannot keep writing to the terminal.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Why a bridge stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// The host received an interrupt key.
    Interrupt(InterruptKey),
    /// The application sent an [`ExitRequest`].
    Requested,
    /// Every source closed.
    Detached,
}

/// How a bridge run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeExit {
    /// Process exit code.
    pub code: i32,
    /// Why the run ended.
    pub reason: ExitReason,
}

impl BridgeExit {
    /// An exit caused by an interrupt key.
    #[must_use]
    pub const fn interrupt(key: InterruptKey) -> Self {
        Self {
            code: INTERRUPT_EXIT_CODE,
            reason: ExitReason::Interrupt(key),
        }
    }

    /// An exit requested by the application.
    #[must_use]
    pub const fn requested(request: ExitRequest) -> Self {
        Self {
            code: request.code,
            reason: ExitReason::Requested,
        }
    }

    /// An exit because nothing is left to route.
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            code: 0,
            reason: ExitReason::Detached,
        }
    }
}

/// An active terminal bridge.
///
/// Created by [`BridgeBuilder::build`]; the terminal is already in raw
/// mode. Dropping a bridge without running it restores the terminal.
pub struct Bridge<T: TerminalIo> {
    controller: ModeController<T>,
    mode: BridgeMode,
    snapshot: TerminalSnapshot,
    decoder: InputDecoder,
    gate: InterruptGate,
    writer: OutputWriter,
    host_input: Option<InputReceiver>,
    host_resize: Option<ResizeNotifier>,
    app_input: Option<UnboundedSender<InputEvent>>,
    app_resize: Option<UnboundedSender<ResizeEvent>>,
    output: Option<UnboundedReceiver<OutputRequest>>,
    exit: Option<UnboundedReceiver<ExitRequest>>,
}

impl<T: TerminalIo> Bridge<T> {
    /// Start configuring a bridge over `terminal`.
    pub fn builder(terminal: T) -> BridgeBuilder<T> {
        BridgeBuilder::new(terminal)
    }

    /// Terminal state captured at activation.
    #[must_use]
    pub const fn snapshot(&self) -> TerminalSnapshot {
        self.snapshot
    }

    /// Initialization flags for the application.
    #[must_use]
    pub fn init_flags(&self) -> InitFlags {
        InitFlags::new(self.snapshot)
    }

    /// The fixed decoding mode and interrupt policy.
    #[must_use]
    pub const fn mode(&self) -> BridgeMode {
        self.mode
    }

    /// Route events until an exit condition, then restore the terminal.
    ///
    /// Returns the exit code and reason. A failed terminal write ends the
    /// run with [`BridgeError::OutputClosed`](crate::BridgeError::OutputClosed).
    /// A failure to restore the terminal mode is logged and does not change
    /// the outcome.
    ///
    /// The host input reader is not stopped when this returns: on a native
    /// terminal its stdin thread keeps reading (and discarding) until the
    /// process exits. Programs that keep running afterwards should not read
    /// stdin themselves; use [`run_and_exit`](Self::run_and_exit) when the
    /// bridge owns the terminal for the rest of the process.
    pub async fn run(mut self) -> Result<BridgeExit> {
        debug!(
            decoding = %self.mode.decoding,
            interrupt = %self.mode.interrupt,
            "Bridge running"
        );

        let outcome = self.route().await;
        if let Err(e) = self.controller.restore() {
            warn!(error = %e, "Failed to restore terminal mode");
        }

        match &outcome {
            Ok(exit) => debug!(code = exit.code, reason = ?exit.reason, "Bridge stopped"),
            Err(e) => error!(error = %e, "Bridge failed"),
        }

        outcome
    }

    /// Run, restore the terminal and terminate the process.
    ///
    /// The process exits with the code of the [`BridgeExit`], or with
    /// [`FATAL_EXIT_CODE`] if the run failed.
    pub async fn run_and_exit(self) {
        let code = match self.run().await {
            Ok(exit) => exit.code,
            Err(_) => FATAL_EXIT_CODE,
        };
        std::process::exit(code)
    }

    async fn route(&mut self) -> Result<BridgeExit> {
        loop {
            tokio::select! {
                biased;

                request = recv(&mut self.output), if self.output.is_some() => match request {
                    Some(request) => self.write(&request)?,
                    None => {
                        debug!("Output channel closed");
                        self.output = None;
                    }
                },

                chunk = recv(&mut self.host_input), if self.host_input.is_some() => match chunk {
                    Some(chunk) => {
                        if let Some(exit) = self.handle_input(&chunk) {
                            return Ok(exit);
                        }
                    }
                    None => {
                        debug!("Host input closed");
                        self.host_input = None;
                    }
                },

                event = next_resize(&mut self.host_resize), if self.host_resize.is_some() => match event {
                    Some(event) => self.forward_resize(event),
                    None => {
                        debug!("Resize watcher stopped");
                        self.host_resize = None;
                    }
                },

                request = recv(&mut self.exit), if self.exit.is_some() => match request {
                    Some(request) => {
                        debug!(code = request.code, "Exit requested");
                        self.drain_output()?;
                        return Ok(BridgeExit::requested(request));
                    }
                    None => {
                        debug!("Exit channel closed");
                        self.exit = None;
                    }
                },

                else => {
                    debug!("All sources closed");
                    return Ok(BridgeExit::detached());
                }
            }
        }
    }

    fn handle_input(&mut self, chunk: &[u8]) -> Option<BridgeExit> {
        trace!(len = chunk.len(), "Input chunk");

        if let Verdict::Terminate(key) = self.gate.inspect(chunk) {
            debug!(%key, "Interrupt key, terminating");
            return Some(BridgeExit::interrupt(key));
        }

        let Some(tx) = &self.app_input else {
            trace!("No input subscriber, chunk discarded");
            return None;
        };

        for event in self.decoder.decode(chunk) {
            if tx.send(event).is_err() {
                warn!("Input subscriber went away, discarding further input");
                self.app_input = None;
                break;
            }
        }
        None
    }

    fn forward_resize(&mut self, event: ResizeEvent) {
        let Some(tx) = &self.app_resize else {
            return;
        };
        if tx.send(event).is_err() {
            warn!("Resize subscriber went away, discarding further resizes");
            self.app_resize = None;
        }
    }

    fn write(&mut self, request: &OutputRequest) -> Result<()> {
        self.writer.write(self.controller.terminal_mut(), request)
    }

    /// Write output that was queued before an exit request.
    fn drain_output(&mut self) -> Result<()> {
        let Some(output) = self.output.as_mut() else {
            return Ok(());
        };
        let mut pending = Vec::new();
        while let Ok(request) = output.try_recv() {
            pending.push(request);
        }
        for request in &pending {
            self.write(request)?;
        }
        Ok(())
    }
}

impl<T: TerminalIo> std::fmt::Debug for Bridge<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("mode", &self.mode)
            .field("snapshot", &self.snapshot)
            .field("writer", &self.writer)
            .finish_non_exhaustive()
    }
}

async fn recv<M>(rx: &mut Option<UnboundedReceiver<M>>) -> Option<M> {
    match rx {
        Some(rx) => rx.recv().await,
        None => None,
    }
}

async fn next_resize(notifier: &mut Option<ResizeNotifier>) -> Option<ResizeEvent> {
    match notifier {
        Some(notifier) => notifier.next().await,
        None => None,
    }
}
