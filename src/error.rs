//! Crate-wide error type.
//!
//! Decode failures are never represented here — per the codec's contract
//! they surface only as `valid = false` on the relevant result type.

use thiserror::Error;

/// The kinds of failure the core can raise, per the wire/config contract.
#[derive(Debug, Error)]
pub enum Error {
    /// OS-level failure opening, binding, writing, reading, or closing the
    /// CAN endpoint.
    #[error("CAN socket error on {interface}: {source}")]
    Socket {
        interface: String,
        #[source]
        source: std::io::Error,
    },

    /// A read exceeded the configured receive timeout.
    #[error("timed out waiting for a frame on {interface}")]
    Timeout { interface: String },

    /// Arity mismatch in `init_*`, overlapping receive IDs, or an
    /// otherwise-invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// `*_control_all(params)` called with `len(params) != motor_count`.
    #[error("arity mismatch: expected {expected} params, got {got}")]
    Arity { expected: usize, got: usize },
}

impl Error {
    pub(crate) fn socket(interface: &str, source: std::io::Error) -> Self {
        Self::Socket {
            interface: interface.to_string(),
            source,
        }
    }

    pub(crate) fn timeout(interface: &str) -> Self {
        Self::Timeout {
            interface: interface.to_string(),
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;
