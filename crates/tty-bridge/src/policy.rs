//! Interrupt handling.
//!
//! Under [`InterruptPolicy::HostHandled`] every input chunk is inspected
//! before decoding. A chunk that is exactly one Escape byte or exactly one
//! Ctrl-C byte ends the bridge with exit code 0 and is not forwarded.
//! Chunks that merely contain those bytes (an arrow key sequence, a paste)
//! pass through untouched.
//!
//! Under [`InterruptPolicy::DelegateToApplication`] nothing is intercepted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::InterruptPolicy;

/// Exit code used when the host handles an interrupt key.
pub const INTERRUPT_EXIT_CODE: i32 = 0;

/// A key the host treats as an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterruptKey {
    /// A lone `0x1B`.
    Escape,
    /// A lone `0x03`.
    CtrlC,
}

impl InterruptKey {
    /// Match a whole chunk against the interrupt keys.
    #[must_use]
    pub const fn from_chunk(chunk: &[u8]) -> Option<Self> {
        match chunk {
            [0x1B] => Some(Self::Escape),
            [0x03] => Some(Self::CtrlC),
            _ => None,
        }
    }

    /// The byte this key produces.
    #[must_use]
    pub const fn byte(self) -> u8 {
        match self {
            Self::Escape => 0x1B,
            Self::CtrlC => 0x03,
        }
    }
}

impl fmt::Display for InterruptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Escape => f.write_str("Escape"),
            Self::CtrlC => f.write_str("Ctrl-C"),
        }
    }
}

/// What to do with an input chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Decode and forward the chunk.
    Forward,
    /// Drop the chunk and terminate.
    Terminate(InterruptKey),
}

/// Applies an [`InterruptPolicy`] to input chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterruptGate {
    policy: InterruptPolicy,
}

impl InterruptGate {
    /// Create a gate for the given policy.
    #[must_use]
    pub const fn new(policy: InterruptPolicy) -> Self {
        Self { policy }
    }

    /// The policy in force.
    #[must_use]
    pub const fn policy(&self) -> InterruptPolicy {
        self.policy
    }

    /// Inspect a chunk before it is decoded.
    #[must_use]
    pub const fn inspect(&self, chunk: &[u8]) -> Verdict {
        match self.policy {
            InterruptPolicy::DelegateToApplication => Verdict::Forward,
            InterruptPolicy::HostHandled => match InterruptKey::from_chunk(chunk) {
                Some(key) => Verdict::Terminate(key),
                None => Verdict::Forward,
            },
        }
    }
}
