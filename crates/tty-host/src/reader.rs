//! stdin reader for raw terminal input.
//!
//! Reads raw bytes from stdin on a dedicated thread and hands each read to
//! an async channel as one chunk.

use std::io::{self, Read};
use std::thread;

use tokio::sync::mpsc;

use crate::traits::InputReceiver;

/// Size of a single stdin read.
pub const INPUT_CHUNK_SIZE: usize = 1024;

/// Spawn the stdin reader thread.
///
/// The thread blocks on stdin for the rest of the process's life; it ends on
/// EOF, on a read error, or once the receiver has been dropped and the next
/// chunk arrives.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_stdin_reader() -> io::Result<InputReceiver> {
    spawn_reader(io::stdin(), "tty-stdin")
}

/// Spawn a reader thread over any byte source.
pub(crate) fn spawn_reader<R>(source: R, name: &str) -> io::Result<InputReceiver>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || read_loop(source, &tx))?;
    Ok(rx)
}

fn read_loop<R: Read>(mut source: R, tx: &mpsc::UnboundedSender<Vec<u8>>) {
    let mut buf = [0u8; INPUT_CHUNK_SIZE];

    loop {
        match source.read(&mut buf) {
            Ok(0) => {
                tracing::debug!("input reached EOF");
                break;
            }
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                tracing::warn!(error = %e, "input read failed");
                break;
            }
        }
    }
}
