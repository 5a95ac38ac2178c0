//! Unified error type for equation decoding.
//!
//! Decoder errors are sticky and fatal to the current equation only: the
//! parser records the first error, keeps the partial record list, and the
//! renderer turns an errored equation into an empty string.

use thiserror::Error;

/// Errors surfaced while decoding an equation stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A primitive read ran past the end of the equation body.
    #[error("unexpected end of equation data at offset {0}")]
    UnexpectedEof(usize),

    /// The 28-byte EQNOLEFILEHDR did not validate.
    #[error("invalid equation stream header: {0}")]
    InvalidHeader(String),

    /// A record tag outside the known set (and below the FUTURE range).
    #[error("unknown record type {tag:#04x} at offset {offset}")]
    UnknownRecord { tag: u8, offset: usize },

    /// A record body contradicted its own framing.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

/// Result type for equation decoding operations.
pub type Result<T> = std::result::Result<T, Error>;
