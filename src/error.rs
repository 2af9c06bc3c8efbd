//! Error types for stamp coding, name editing and version discovery.

use std::time::Duration;
use thiserror::Error;

/// Failures decoding or validating ccnb-encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodingError {
    #[error("Truncated input at byte {0}")]
    Truncated(usize),

    #[error("Unexpected token at byte {offset}: expected {expected}")]
    UnexpectedToken { offset: usize, expected: &'static str },

    #[error("Unsupported token type {tt} at byte {offset}")]
    UnsupportedToken { offset: usize, tt: u8 },

    #[error("Token value overflows at byte {0}")]
    Overflow(usize),

    #[error("Trailing bytes after element end at byte {0}")]
    TrailingBytes(usize),

    #[error("Invalid membership filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid name URI: {0}")]
    InvalidUri(String),
}

/// Failures reported by a content fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("No response within {0:?}")]
    Timeout(Duration),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Version bound of {0} bytes is outside the 3 to 16 byte window")]
    InvalidBound(usize),

    #[error("New version stamp is not later than the existing one")]
    NonMonotonic,

    #[error("Encoding error: {0}")]
    EncodingError(#[from] CodingError),

    #[error("Fetch error: {0}")]
    FetchError(#[from] FetchError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for VersionError {
    fn from(err: config::ConfigError) -> Self {
        VersionError::ConfigError(err.to_string())
    }
}
