//! Escape sequence parser for structured decoding.
//!
//! Turns one input chunk into key presses:
//! - Control bytes (Ctrl+letter, Enter, Tab, Backspace, Ctrl+Space)
//! - Printable ASCII and UTF-8 characters
//! - Alt/meta keys (ESC + key)
//! - CSI sequences (arrows, Home/End, tilde keys, F1-F12, Shift+Tab),
//!   with xterm modifier parameters
//! - SS3 sequences (arrows, Home/End, F1-F4)
//!
//! Chunks are parsed independently. Anything that does not form a known
//! key, including a sequence cut short by the end of the chunk, becomes a
//! single [`KeyEvent::UNIDENTIFIED`] key carrying the bytes in `sequence`.

use crate::event::{KeyEvent, Modifiers};

const ESC: u8 = 0x1B;

/// Parse a chunk into key events, in order.
#[must_use]
pub fn parse_keys(chunk: &[u8]) -> Vec<KeyEvent> {
    let mut keys = Vec::new();
    let mut rest = chunk;

    while !rest.is_empty() {
        let (len, key) = parse_one(rest);
        keys.push(key);
        rest = &rest[len..];
    }

    keys
}

/// What a single parse step recognized.
enum Parsed {
    Key(&'static str, Modifiers),
    Char(char, Modifiers),
    Unidentified,
}

/// Parse one key from the front of `bytes`; always consumes at least one byte.
fn parse_one(bytes: &[u8]) -> (usize, KeyEvent) {
    let (len, parsed) = match bytes[0] {
        ESC => parse_escape(bytes),
        _ => parse_plain(bytes),
    };
    (len, build(&bytes[..len], parsed))
}

fn build(sequence: &[u8], parsed: Parsed) -> KeyEvent {
    let sequence = String::from_utf8_lossy(sequence);
    match parsed {
        Parsed::Key(name, modifiers) => KeyEvent::new(name, sequence).with_modifiers(modifiers),
        Parsed::Char(ch, modifiers) => {
            let shift = if ch.is_uppercase() { Modifiers::SHIFT } else { Modifiers::NONE };
            let name: String = ch.to_lowercase().collect();
            KeyEvent::new(name, sequence).with_modifiers(modifiers.union(shift))
        }
        Parsed::Unidentified => KeyEvent::new(KeyEvent::UNIDENTIFIED, sequence),
    }
}

/// Anything that does not start with ESC.
fn parse_plain(bytes: &[u8]) -> (usize, Parsed) {
    let first = bytes[0];
    let parsed = match first {
        0x00 => Parsed::Key("Space", Modifiers::CTRL),
        0x08 | 0x7F => Parsed::Key("Backspace", Modifiers::NONE),
        b'\t' => Parsed::Key("Tab", Modifiers::NONE),
        b'\n' | b'\r' => Parsed::Key("Enter", Modifiers::NONE),
        0x01..=0x1A => Parsed::Char(char::from(first + 0x60), Modifiers::CTRL),
        0x1C..=0x1F => Parsed::Char(char::from(first + 0x40), Modifiers::CTRL),
        b' ' => Parsed::Key("Space", Modifiers::NONE),
        0x21..=0x7E => Parsed::Char(char::from(first), Modifiers::NONE),
        _ => return parse_utf8(bytes),
    };
    (1, parsed)
}

fn parse_utf8(bytes: &[u8]) -> (usize, Parsed) {
    let width = match bytes[0] {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return (1, Parsed::Unidentified),
    };
    match bytes
        .get(..width)
        .and_then(|b| std::str::from_utf8(b).ok())
        .and_then(|s| s.chars().next())
    {
        Some(ch) => (width, Parsed::Char(ch, Modifiers::NONE)),
        None => (1, Parsed::Unidentified),
    }
}

fn parse_escape(bytes: &[u8]) -> (usize, Parsed) {
    let Some(&second) = bytes.get(1) else {
        return (1, Parsed::Key("Escape", Modifiers::NONE));
    };

    match second {
        b'[' => parse_csi(bytes),
        b'O' if bytes.len() > 2 => parse_ss3(bytes),
        ESC => match bytes.get(2) {
            // ESC ESC [ A: meta + the escape sequence that follows
            Some(b'[' | b'O') => {
                let (len, parsed) = parse_escape(&bytes[1..]);
                (len + 1, with_meta(parsed))
            }
            _ => (2, Parsed::Key("Escape", Modifiers::META)),
        },
        _ => {
            let (len, parsed) = parse_plain(&bytes[1..]);
            (len + 1, with_meta(parsed))
        }
    }
}

fn with_meta(parsed: Parsed) -> Parsed {
    match parsed {
        Parsed::Key(name, modifiers) => Parsed::Key(name, modifiers.union(Modifiers::META)),
        Parsed::Char(ch, modifiers) => Parsed::Char(ch, modifiers.union(Modifiers::META)),
        Parsed::Unidentified => Parsed::Unidentified,
    }
}

/// `ESC [ params final`.
fn parse_csi(bytes: &[u8]) -> (usize, Parsed) {
    // Linux console F1-F5: ESC [ [ A..E
    if bytes.get(2) == Some(&b'[') {
        return match bytes.get(3) {
            Some(&b @ b'A'..=b'E') => (4, Parsed::Key(function_key(b - b'A' + 1), Modifiers::NONE)),
            _ => (bytes.len().min(3), Parsed::Unidentified),
        };
    }

    let mut end = 2;
    while let Some(&b) = bytes.get(end) {
        match b {
            0x20..=0x3F => end += 1,
            0x40..=0x7E => break,
            // Not part of a CSI sequence; stop before it.
            _ => return (end, Parsed::Unidentified),
        }
    }
    let Some(&final_byte) = bytes.get(end) else {
        return (bytes.len(), Parsed::Unidentified);
    };

    let params = parse_params(&bytes[2..end]);
    let modifiers = params
        .get(1)
        .copied()
        .flatten()
        .map_or(Modifiers::NONE, Modifiers::from_xterm);

    let parsed = match final_byte {
        b'Z' => Parsed::Key("Tab", Modifiers::SHIFT.union(modifiers)),
        b'~' => match params.first().copied().flatten().and_then(tilde_key) {
            Some(name) => Parsed::Key(name, modifiers),
            None => Parsed::Unidentified,
        },
        other => match cursor_key(other) {
            Some(name) => Parsed::Key(name, modifiers),
            None => Parsed::Unidentified,
        },
    };
    (end + 1, parsed)
}

/// `ESC O [modifier] final`.
fn parse_ss3(bytes: &[u8]) -> (usize, Parsed) {
    let mut end = 2;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let Some(&final_byte) = bytes.get(end) else {
        return (bytes.len(), Parsed::Unidentified);
    };

    let modifiers = std::str::from_utf8(&bytes[2..end])
        .ok()
        .and_then(|digits| digits.parse::<u16>().ok())
        .map_or(Modifiers::NONE, Modifiers::from_xterm);

    let parsed = match final_byte {
        b'M' => Parsed::Key("Enter", modifiers),
        other => match cursor_key(other) {
            Some(name) => Parsed::Key(name, modifiers),
            None => Parsed::Unidentified,
        },
    };
    (end + 1, parsed)
}

/// Semicolon separated numeric parameters; empty or invalid entries are `None`.
fn parse_params(raw: &[u8]) -> Vec<Option<u16>> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|p| std::str::from_utf8(p).ok().and_then(|s| s.parse().ok()))
        .collect()
}

/// Final bytes shared by CSI and SS3 sequences.
const fn cursor_key(final_byte: u8) -> Option<&'static str> {
    Some(match final_byte {
        b'A' => "ArrowUp",
        b'B' => "ArrowDown",
        b'C' => "ArrowRight",
        b'D' => "ArrowLeft",
        b'H' => "Home",
        b'F' => "End",
        b'P' => "F1",
        b'Q' => "F2",
        b'R' => "F3",
        b'S' => "F4",
        _ => return None,
    })
}

/// `ESC [ n ~` keys.
const fn tilde_key(code: u16) -> Option<&'static str> {
    Some(match code {
        1 | 7 => "Home",
        2 => "Insert",
        3 => "Delete",
        4 | 8 => "End",
        5 => "PageUp",
        6 => "PageDown",
        11..=15 => function_key((code - 10) as u8),
        17..=21 => function_key((code - 11) as u8),
        23 | 24 => function_key((code - 12) as u8),
        _ => return None,
    })
}

const fn function_key(n: u8) -> &'static str {
    match n {
        1 => "F1",
        2 => "F2",
        3 => "F3",
        4 => "F4",
        5 => "F5",
        6 => "F6",
        7 => "F7",
        8 => "F8",
        9 => "F9",
        10 => "F10",
        11 => "F11",
        _ => "F12",
    }
}
