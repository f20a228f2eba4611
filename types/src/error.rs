//! Errors raised while constructing or parsing the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("identifier is empty")]
    EmptyIdentifier,

    #[error("identifier is too long: {len} bytes, maximum {max}")]
    IdentifierTooLong { len: usize, max: usize },

    #[error("identifier contains the reserved separator '|'")]
    ReservedSeparator,

    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
