//! # Error Types
//!
//! Parsing errors for the shared identifiers.

use thiserror::Error;

/// Errors produced when decoding a `PeerId` or `Cid` from external input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// Input had the wrong number of bytes.
    #[error("invalid identifier length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Input was not valid hexadecimal.
    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),
}
