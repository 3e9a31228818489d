//! # Error Types
//!
//! Defines error types used across crates.

use thiserror::Error;

/// Errors raised while encoding or decoding a signed operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The operation carries no signature at all.
    #[error("Operation has no signatures")]
    MissingSignature,

    /// Serialization to wire bytes failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Wire bytes could not be decoded.
    #[error("Deserialization failed: {0}")]
    Deserialization(String),
}
