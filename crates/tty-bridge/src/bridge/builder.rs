//! Bridge construction.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::debug;
use tty_host::{NativeTerminal, TerminalIo};

use super::Bridge;
use crate::config::{BridgeConfig, BridgeMode, Decoding, InterruptPolicy};
use crate::decode::InputDecoder;
use crate::error::{BridgeError, Result};
use crate::event::{ExitRequest, InputEvent, OutputRequest, ResizeEvent};
use crate::mode::ModeController;
use crate::policy::InterruptGate;
use crate::ports::BridgePorts;
use crate::resize::ResizeNotifier;
use crate::writer::OutputWriter;

/// Builder for [`Bridge`].
///
/// Collects the mode and the application's channel ends. Mistakes
/// (registering a channel twice, asking for two different decoding modes)
/// are remembered and reported together by [`build`](Self::build), before
/// the terminal is touched.
pub struct BridgeBuilder<T: TerminalIo> {
    terminal: T,
    decoding: Option<Decoding>,
    interrupt: Option<InterruptPolicy>,
    input: Option<UnboundedSender<InputEvent>>,
    resize: Option<UnboundedSender<ResizeEvent>>,
    output: Option<UnboundedReceiver<OutputRequest>>,
    exit: Option<UnboundedReceiver<ExitRequest>>,
    problems: Vec<String>,
}

impl BridgeBuilder<NativeTerminal> {
    /// Start configuring a bridge over the process terminal.
    #[must_use]
    pub fn native() -> Self {
        Self::new(NativeTerminal::new())
    }
}

impl<T: TerminalIo> BridgeBuilder<T> {
    /// Start configuring a bridge over `terminal`.
    pub const fn new(terminal: T) -> Self {
        Self {
            terminal,
            decoding: None,
            interrupt: None,
            input: None,
            resize: None,
            output: None,
            exit: None,
            problems: Vec::new(),
        }
    }

    /// Set the decoding mode. Defaults to [`Decoding::RawPassthrough`].
    #[must_use]
    pub fn decoding(mut self, decoding: Decoding) -> Self {
        match self.decoding {
            Some(existing) if existing != decoding => self.problems.push(format!(
                "conflicting decoding modes: {existing} and {decoding}"
            )),
            _ => self.decoding = Some(decoding),
        }
        self
    }

    /// Set the interrupt policy. Defaults to [`InterruptPolicy::HostHandled`].
    #[must_use]
    pub fn interrupt(mut self, policy: InterruptPolicy) -> Self {
        match self.interrupt {
            Some(existing) if existing != policy => self.problems.push(format!(
                "conflicting interrupt policies: {existing} and {policy}"
            )),
            _ => self.interrupt = Some(policy),
        }
        self
    }

    /// Apply the mode settings of a [`BridgeConfig`].
    #[must_use]
    pub fn config(self, config: &BridgeConfig) -> Self {
        self.decoding(config.decoding).interrupt(config.interrupt)
    }

    /// Register the input subscriber.
    #[must_use]
    pub fn input(mut self, tx: UnboundedSender<InputEvent>) -> Self {
        register(&mut self.input, tx, "input", &mut self.problems);
        self
    }

    /// Register the resize subscriber.
    ///
    /// Without one the host resize watcher is never started.
    #[must_use]
    pub fn resize(mut self, tx: UnboundedSender<ResizeEvent>) -> Self {
        register(&mut self.resize, tx, "resize", &mut self.problems);
        self
    }

    /// Register the source of output requests.
    #[must_use]
    pub fn output(mut self, rx: UnboundedReceiver<OutputRequest>) -> Self {
        register(&mut self.output, rx, "output", &mut self.problems);
        self
    }

    /// Register the source of exit requests.
    #[must_use]
    pub fn exit(mut self, rx: UnboundedReceiver<ExitRequest>) -> Self {
        register(&mut self.exit, rx, "exit", &mut self.problems);
        self
    }

    /// Register all four channels from [`connect`](crate::connect).
    #[must_use]
    pub fn ports(self, ports: BridgePorts) -> Self {
        self.input(ports.input)
            .resize(ports.resize)
            .output(ports.output)
            .exit(ports.exit)
    }

    /// Validate the configuration, activate the terminal and return the
    /// bridge.
    ///
    /// On a host failure the terminal is returned to its prior mode and no
    /// bridge is created.
    pub fn build(self) -> Result<Bridge<T>> {
        if !self.problems.is_empty() {
            return Err(BridgeError::config(self.problems.join("; ")));
        }

        let mode = BridgeMode {
            decoding: self.decoding.unwrap_or_default(),
            interrupt: self.interrupt.unwrap_or_default(),
        };
        if mode.interrupt == InterruptPolicy::DelegateToApplication && self.input.is_none() {
            return Err(BridgeError::config(
                "interrupt handling is delegated but no input subscriber is registered",
            ));
        }

        let mut controller = ModeController::new(self.terminal);
        let snapshot = controller.activate()?;
        // Dropping the controller on error restores the terminal.
        let host_resize = match self.resize {
            Some(_) => Some(ResizeNotifier::start(controller.terminal_mut())?),
            None => None,
        };
        let host_input = controller.take_input();

        debug!(
            decoding = %mode.decoding,
            interrupt = %mode.interrupt,
            input = self.input.is_some(),
            resize = self.resize.is_some(),
            output = self.output.is_some(),
            exit = self.exit.is_some(),
            "Bridge built"
        );

        Ok(Bridge {
            controller,
            mode,
            snapshot,
            decoder: InputDecoder::new(mode.decoding),
            gate: InterruptGate::new(mode.interrupt),
            writer: OutputWriter::new(),
            host_input,
            host_resize,
            app_input: self.input,
            app_resize: self.resize,
            output: self.output,
            exit: self.exit,
        })
    }
}

impl<T: TerminalIo> std::fmt::Debug for BridgeBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeBuilder")
            .field("decoding", &self.decoding)
            .field("interrupt", &self.interrupt)
            .field("problems", &self.problems)
            .finish_non_exhaustive()
    }
}

fn register<C>(slot: &mut Option<C>, channel: C, name: &str, problems: &mut Vec<String>) {
    if slot.is_some() {
        problems.push(format!("{name} channel registered twice"));
    } else {
        *slot = Some(channel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::connect;
    use crate::test_utils::FakeTerminal;
    use tokio::sync::mpsc;

    #[test]
    fn defaults() {
        let (terminal, handle) = FakeTerminal::builder().size(90, 33).color_depth(4).build();
        let bridge = Bridge::builder(terminal).build().unwrap();
        assert_eq!(bridge.mode(), BridgeMode::default());
        assert_eq!(bridge.snapshot().columns, 90);
        assert_eq!(bridge.snapshot().color_depth, 4);
        assert!(handle.is_raw());
        assert!(handle.input_started());
        assert!(!handle.resize_watched());
    }

    #[test]
    fn duplicate_input_subscriber_is_rejected() {
        let (terminal, handle) = FakeTerminal::new();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let err = Bridge::builder(terminal).input(tx1).input(tx2).build().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("input channel registered twice"));
        assert!(!handle.is_raw());
    }

    #[test]
    fn conflicting_modes_are_rejected() {
        let (terminal, _handle) = FakeTerminal::new();
        let err = Bridge::builder(terminal)
            .decoding(Decoding::Structured)
            .decoding(Decoding::RawPassthrough)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("conflicting decoding modes"));

        let (terminal, _handle) = FakeTerminal::new();
        let (_app, ports) = connect();
        let err = Bridge::builder(terminal)
            .ports(ports)
            .interrupt(InterruptPolicy::HostHandled)
            .config(&BridgeConfig::new().interrupt(InterruptPolicy::DelegateToApplication))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("conflicting interrupt policies"));
    }

    #[test]
    fn repeating_the_same_mode_is_fine() {
        let (terminal, _handle) = FakeTerminal::new();
        let bridge = Bridge::builder(terminal)
            .decoding(Decoding::Structured)
            .config(&BridgeConfig::new().decoding(Decoding::Structured))
            .build()
            .unwrap();
        assert_eq!(bridge.mode().decoding, Decoding::Structured);
    }

    #[test]
    fn delegate_requires_input_subscriber() {
        let (terminal, handle) = FakeTerminal::new();
        let err = Bridge::builder(terminal)
            .interrupt(InterruptPolicy::DelegateToApplication)
            .build()
            .unwrap_err();
        assert!(err.is_config());
        assert!(!handle.input_started());
    }

    #[test]
    fn raw_mode_failure_aborts_construction() {
        let (terminal, handle) = FakeTerminal::builder().fail_raw_mode().build();
        let (_app, ports) = connect();
        let err = Bridge::builder(terminal).ports(ports).build().unwrap_err();
        assert!(matches!(err, BridgeError::Host(_)));
        assert!(!handle.is_raw());
    }

    #[test]
    fn resize_watcher_failure_rolls_back() {
        let (terminal, handle) = FakeTerminal::builder().fail_resize().build();
        let (_app, ports) = connect();
        let err = Bridge::builder(terminal).ports(ports).build().unwrap_err();
        assert!(matches!(err, BridgeError::Host(_)));
        assert!(!handle.is_raw());
    }

    #[test]
    fn resize_subscriber_starts_watcher() {
        let (terminal, handle) = FakeTerminal::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let _bridge = Bridge::builder(terminal).resize(tx).build().unwrap();
        assert!(handle.resize_watched());
    }
}
