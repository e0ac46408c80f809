//! Messages exchanged between the bridge and the application.
//!
//! Inbound (bridge to application): [`InputEvent`] and [`ResizeEvent`].
//! Outbound (application to bridge): [`OutputRequest`] and [`ExitRequest`].
//! [`TerminalSnapshot`] and [`InitFlags`] describe the terminal at startup.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tty_host::WindowSize;

/// Terminal state captured once when the bridge activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalSnapshot {
    /// Color depth in bits per color (1, 4, 8 or 24).
    pub color_depth: u8,
    /// Number of columns.
    pub columns: u16,
    /// Number of rows.
    pub rows: u16,
}

impl TerminalSnapshot {
    /// Create a snapshot.
    #[must_use]
    pub const fn new(color_depth: u8, columns: u16, rows: u16) -> Self {
        Self {
            color_depth,
            columns,
            rows,
        }
    }

    /// The snapshot as a JSON object (`colorDepth`, `columns`, `rows`).
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "colorDepth": self.color_depth,
            "columns": self.columns,
            "rows": self.rows,
        })
    }
}

/// Initialization flags handed to an application at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitFlags {
    /// Terminal state at activation.
    pub snapshot: TerminalSnapshot,
    /// Milliseconds since the Unix epoch when the flags were created.
    pub timestamp: u64,
}

impl InitFlags {
    /// Create flags stamped with the current time.
    #[must_use]
    pub fn new(snapshot: TerminalSnapshot) -> Self {
        Self {
            snapshot,
            timestamp: Self::timestamp(),
        }
    }

    /// Current time in milliseconds since the Unix epoch.
    #[must_use]
    pub fn timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// A terminal geometry change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResizeEvent {
    /// New number of columns.
    pub columns: u16,
    /// New number of rows.
    pub rows: u16,
}

impl ResizeEvent {
    /// Create a resize event.
    #[must_use]
    pub const fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }
}

impl From<WindowSize> for ResizeEvent {
    fn from(size: WindowSize) -> Self {
        Self::new(size.cols, size.rows)
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    /// Control.
    pub ctrl: bool,
    /// Meta / Alt.
    pub meta: bool,
    /// Shift.
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        shift: false,
    };

    /// Control only.
    pub const CTRL: Self = Self {
        ctrl: true,
        meta: false,
        shift: false,
    };

    /// Meta only.
    pub const META: Self = Self {
        ctrl: false,
        meta: true,
        shift: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        ctrl: false,
        meta: false,
        shift: true,
    };

    /// Decode an xterm modifier parameter (`1 + bitmask`).
    ///
    /// Bit 0 is shift, bit 1 alt, bit 2 control and bit 3 meta; alt and
    /// meta both map to `meta`.
    #[must_use]
    pub const fn from_xterm(param: u16) -> Self {
        let bits = param.saturating_sub(1);
        Self {
            shift: bits & 1 != 0,
            meta: bits & 2 != 0 || bits & 8 != 0,
            ctrl: bits & 4 != 0,
        }
    }

    /// Combine two modifier sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            ctrl: self.ctrl || other.ctrl,
            meta: self.meta || other.meta,
            shift: self.shift || other.shift,
        }
    }

    /// Check whether no modifier is held.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.ctrl && !self.meta && !self.shift
    }
}

/// A named key press.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key name, e.g. `ArrowUp`, `Enter`, `F5`, `a`.
    pub name: String,
    /// The raw sequence that produced the key.
    pub sequence: String,
    /// Modifiers held during the press.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Name used for input that forms no recognized key.
    pub const UNIDENTIFIED: &'static str = "Unidentified";

    /// Create a key event without modifiers.
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Set the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check whether this is the unrecognized-input fallback.
    #[must_use]
    pub fn is_unidentified(&self) -> bool {
        self.name == Self::UNIDENTIFIED
    }
}

/// A decoded piece of terminal input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// A chunk of text, forwarded verbatim (pass-through decoding).
    RawChunk(String),
    /// A key press (structured decoding).
    Key(KeyEvent),
}

impl InputEvent {
    /// The text of a raw chunk.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::RawChunk(text) => Some(text),
            Self::Key(_) => None,
        }
    }

    /// The key of a key event.
    #[must_use]
    pub const fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(key) => Some(key),
            Self::RawChunk(_) => None,
        }
    }
}

/// An opaque payload to be written to the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct OutputRequest(Bytes);

impl OutputRequest {
    /// Create a request from bytes.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self(payload.into())
    }

    /// The payload bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the payload.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl From<Bytes> for OutputRequest {
    fn from(payload: Bytes) -> Self {
        Self(payload)
    }
}

impl From<String> for OutputRequest {
    fn from(payload: String) -> Self {
        Self(Bytes::from(payload))
    }
}

impl From<Vec<u8>> for OutputRequest {
    fn from(payload: Vec<u8>) -> Self {
        Self(Bytes::from(payload))
    }
}

impl From<&str> for OutputRequest {
    fn from(payload: &str) -> Self {
        Self(Bytes::copy_from_slice(payload.as_bytes()))
    }
}

impl From<&[u8]> for OutputRequest {
    fn from(payload: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(payload))
    }
}

/// An explicit request to terminate the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExitRequest {
    /// Process exit code.
    pub code: i32,
}

impl ExitRequest {
    /// Create an exit request.
    #[must_use]
    pub const fn new(code: i32) -> Self {
        Self { code }
    }

    /// A request to exit with code 0.
    #[must_use]
    pub const fn success() -> Self {
        Self::new(0)
    }
}

impl From<i32> for ExitRequest {
    fn from(code: i32) -> Self {
        Self::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_json_shape() {
        let snapshot = TerminalSnapshot::new(8, 120, 40);
        assert_eq!(
            snapshot.to_json(),
            serde_json::json!({"colorDepth": 8, "columns": 120, "rows": 40})
        );
        assert_eq!(serde_json::to_value(snapshot).unwrap(), snapshot.to_json());
    }

    #[test]
    fn init_flags_carry_timestamp() {
        let flags = InitFlags::new(TerminalSnapshot::new(4, 80, 24));
        assert!(flags.timestamp > 0);
        let json = serde_json::to_value(flags).unwrap();
        assert_eq!(json["snapshot"]["colorDepth"], 4);
    }

    #[test]
    fn xterm_modifiers() {
        assert_eq!(Modifiers::from_xterm(1), Modifiers::NONE);
        assert_eq!(Modifiers::from_xterm(2), Modifiers::SHIFT);
        assert_eq!(Modifiers::from_xterm(3), Modifiers::META);
        assert_eq!(Modifiers::from_xterm(5), Modifiers::CTRL);
        let all = Modifiers::from_xterm(8);
        assert!(all.ctrl && all.meta && all.shift);
        assert_eq!(Modifiers::from_xterm(0), Modifiers::NONE);
    }

    #[test]
    fn key_event_json_shape() {
        let key = KeyEvent::new("ArrowUp", "\x1b[A");
        let event = InputEvent::Key(key);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Key");
        assert_eq!(json["data"]["name"], "ArrowUp");
        assert_eq!(json["data"]["modifiers"]["ctrl"], false);
    }

    #[test]
    fn output_request_conversions() {
        assert_eq!(OutputRequest::from("hi").as_bytes(), b"hi");
        assert_eq!(OutputRequest::from(String::from("hi")).len(), 2);
        assert_eq!(OutputRequest::from(vec![0x1b, b'[']).as_bytes(), b"\x1b[");
        assert!(OutputRequest::default().is_empty());
    }

    #[test]
    fn resize_from_window_size() {
        let event = ResizeEvent::from(WindowSize::new(100, 50));
        assert_eq!(event, ResizeEvent::new(100, 50));
    }
}
