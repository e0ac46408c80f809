//! Channel ends connecting an application to a bridge.
//!
//! [`connect`] creates the four channels in one go and splits them into
//! the application's side ([`AppPorts`]) and the bridge's side
//! ([`BridgePorts`], handed to
//! [`BridgeBuilder::ports`](crate::BridgeBuilder::ports)). Every channel
//! has exactly one producer and one consumer.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::event::{ExitRequest, InputEvent, OutputRequest, ResizeEvent};

/// The application's ends of the bridge channels.
#[derive(Debug)]
pub struct AppPorts {
    /// Decoded input from the terminal.
    pub input: UnboundedReceiver<InputEvent>,
    /// Window-size changes.
    pub resize: UnboundedReceiver<ResizeEvent>,
    /// Payloads to write to the terminal.
    pub output: UnboundedSender<OutputRequest>,
    /// Requests to terminate.
    pub exit: UnboundedSender<ExitRequest>,
}

/// [`AppPorts`] with the inbound channels wrapped as streams.
#[derive(Debug)]
pub struct AppStreams {
    /// Decoded input from the terminal.
    pub input: UnboundedReceiverStream<InputEvent>,
    /// Window-size changes.
    pub resize: UnboundedReceiverStream<ResizeEvent>,
    /// Payloads to write to the terminal.
    pub output: UnboundedSender<OutputRequest>,
    /// Requests to terminate.
    pub exit: UnboundedSender<ExitRequest>,
}

impl AppPorts {
    /// Convert the inbound channels into [`tokio_stream::Stream`]s.
    #[must_use]
    pub fn into_streams(self) -> AppStreams {
        AppStreams {
            input: UnboundedReceiverStream::new(self.input),
            resize: UnboundedReceiverStream::new(self.resize),
            output: self.output,
            exit: self.exit,
        }
    }

    /// Queue a payload for the terminal.
    ///
    /// Returns `false` if the bridge has stopped.
    #[must_use]
    pub fn write(&self, request: impl Into<OutputRequest>) -> bool {
        self.output.send(request.into()).is_ok()
    }

    /// Ask the bridge to terminate with `code`.
    ///
    /// Returns `false` if the bridge has stopped.
    #[must_use]
    pub fn request_exit(&self, code: i32) -> bool {
        self.exit.send(ExitRequest::new(code)).is_ok()
    }
}

/// The bridge's ends of the channels.
#[derive(Debug)]
pub struct BridgePorts {
    /// Sender for decoded input.
    pub input: UnboundedSender<InputEvent>,
    /// Sender for window-size changes.
    pub resize: UnboundedSender<ResizeEvent>,
    /// Receiver of output payloads.
    pub output: UnboundedReceiver<OutputRequest>,
    /// Receiver of exit requests.
    pub exit: UnboundedReceiver<ExitRequest>,
}

/// Create connected application and bridge ports.
#[must_use]
pub fn connect() -> (AppPorts, BridgePorts) {
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (resize_tx, resize_rx) = mpsc::unbounded_channel();
    let (output_tx, output_rx) = mpsc::unbounded_channel();
    let (exit_tx, exit_rx) = mpsc::unbounded_channel();

    (
        AppPorts {
            input: input_rx,
            resize: resize_rx,
            output: output_tx,
            exit: exit_tx,
        },
        BridgePorts {
            input: input_tx,
            resize: resize_tx,
            output: output_rx,
            exit: exit_rx,
        },
    )
}
