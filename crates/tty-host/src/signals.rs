//! Window-change signal handling.
//!
//! SIGWINCH is turned into a stream of [`WindowSize`] values by a dedicated
//! thread. The size is queried when the signal arrives, so every signal
//! produces exactly one value.

use std::io;

use signal_hook::consts::signal::SIGWINCH;
use signal_hook::iterator::{Handle, Signals};
use tokio::sync::mpsc;

use crate::size::WindowSize;
use crate::traits::ResizeReceiver;

/// A handle to the signal watcher that stops it when dropped.
#[derive(Debug)]
pub struct SignalHandle {
    handle: Handle,
}

impl SignalHandle {
    /// Stop watching for signals.
    pub fn shutdown(&self) {
        self.handle.close();
    }

    /// Check whether the watcher has been stopped.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.handle.is_closed()
    }
}

impl Drop for SignalHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start a thread that sends the current window size on every SIGWINCH.
///
/// `query` is called once per received signal. The thread exits when the
/// returned handle is dropped or the receiver is dropped.
///
/// # Errors
///
/// Returns an error if signal registration or thread creation fails.
pub fn watch_window_size<F>(query: F) -> io::Result<(ResizeReceiver, SignalHandle)>
where
    F: Fn() -> WindowSize + Send + 'static,
{
    let mut signals = Signals::new([SIGWINCH])?;
    let handle = signals.handle();
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::Builder::new()
        .name("tty-sigwinch".into())
        .spawn(move || {
            for _ in signals.forever() {
                let size = query();
                tracing::trace!(cols = size.cols, rows = size.rows, "SIGWINCH");
                if tx.send(size).is_err() {
                    break;
                }
            }
            tracing::debug!("window-change watcher stopped");
        })?;

    Ok((rx, SignalHandle { handle }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn sigwinch_produces_size() {
        let (mut rx, handle) = watch_window_size(|| WindowSize::new(100, 30)).unwrap();

        signal_hook::low_level::raise(SIGWINCH).unwrap();

        let size = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("resize not delivered");
        assert_eq!(size, Some(WindowSize::new(100, 30)));
        drop(handle);
    }

    #[test]
    fn handle_shutdown() {
        let (_rx, handle) = watch_window_size(WindowSize::default).unwrap();
        assert!(!handle.is_shutdown());
        handle.shutdown();
        assert!(handle.is_shutdown());
    }
}
