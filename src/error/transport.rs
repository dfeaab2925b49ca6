//! Errors reported by the stream supplying raw chunks.

use thiserror::Error;

/// The underlying stream failed to deliver text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The source reported a read failure.
    #[error("stream read failed: {0}")]
    Read(String),

    /// The byte stream contained an invalid UTF-8 sequence.
    #[error("invalid UTF-8 in stream at byte {offset}")]
    InvalidUtf8 { offset: usize },
}

impl TransportError {
    /// Wrap any displayable source error as a read failure.
    pub fn read<E: std::fmt::Display>(err: E) -> Self {
        TransportError::Read(err.to_string())
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Read(err.to_string())
    }
}
