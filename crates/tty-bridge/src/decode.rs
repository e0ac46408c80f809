//! Input decoding.
//!
//! An [`InputDecoder`] turns each host input chunk into zero or more
//! [`InputEvent`]s according to the bridge's [`Decoding`] mode:
//!
//! - [`Decoding::RawPassthrough`]: the chunk becomes exactly one
//!   [`InputEvent::RawChunk`] with the chunk's text. Empty chunks produce
//!   nothing.
//! - [`Decoding::Structured`]: the chunk is parsed into key presses by
//!   [`keys::parse_keys`].
//!
//! Decoding is per chunk in both modes. Nothing is carried over from one
//! chunk to the next, so a multi-byte character split across two reads
//! arrives as replacement characters.

pub mod keys;

use crate::config::Decoding;
use crate::event::InputEvent;

/// Stateless per-chunk input decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputDecoder {
    mode: Decoding,
}

impl InputDecoder {
    /// Create a decoder for the given mode.
    #[must_use]
    pub const fn new(mode: Decoding) -> Self {
        Self { mode }
    }

    /// The decoding mode.
    #[must_use]
    pub const fn mode(&self) -> Decoding {
        self.mode
    }

    /// Decode one chunk.
    #[must_use]
    pub fn decode(&self, chunk: &[u8]) -> Vec<InputEvent> {
        if chunk.is_empty() {
            return Vec::new();
        }
        match self.mode {
            Decoding::RawPassthrough => {
                vec![InputEvent::RawChunk(String::from_utf8_lossy(chunk).into_owned())]
            }
            Decoding::Structured => keys::parse_keys(chunk)
                .into_iter()
                .map(InputEvent::Key)
                .collect(),
        }
    }
}
