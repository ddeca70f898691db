//! Error types for the checker.
//!
//! Every error here is terminal for the whole run: the checker is a binary
//! pass/fail oracle, so nothing is caught and retried. [`Error::Mismatch`]
//! is the primary signal the tool exists to produce and carries both byte
//! strings for the diagnostic.

use std::io;

/// Result type for checker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Checker errors with structured context.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid configuration, detected before any network activity.
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection establishment failed. The pool opens all connections up
    /// front, so this aborts the run before any trial starts.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Send or receive failed on an established connection.
    #[error("transport error during {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Response bytes differed from the expected value. A short read caused
    /// by the cumulative timeout budget surfaces here too.
    #[error(
        "trial {trial} slot {slot}: response mismatch\n  expected: \"{expected_text}\"\n  received: \"{received_text}\"",
        expected_text = .expected.escape_ascii(),
        received_text = .received.escape_ascii()
    )]
    Mismatch {
        trial: u32,
        slot: usize,
        expected: Vec<u8>,
        received: Vec<u8>,
    },
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a connect error.
    pub fn connect(addr: impl Into<String>, source: io::Error) -> Self {
        Self::Connect {
            addr: addr.into(),
            source,
        }
    }

    /// Create a transport error with context.
    pub fn transport(context: impl Into<String>, source: io::Error) -> Self {
        Self::Transport {
            context: context.into(),
            source,
        }
    }
}
