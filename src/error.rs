//! Failure taxonomy shared by every engine operation.
//!
//! All failures are detected synchronously and returned to the caller;
//! nothing is retried internally. Note that the cipher path cannot detect a
//! wrong secret at all: without an authentication tag, deciphering with the
//! wrong key produces plausible-looking garbage rather than an error.

use thiserror::Error;

/// Errors produced by the pixelveil engine.
#[derive(Error, Debug)]
pub enum VeilError {
    /// The passphrase is empty or otherwise unusable as key material.
    #[error("invalid secret: passphrase must not be empty")]
    InvalidSecret,

    /// The image container format is unknown or unsupported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The container was recognized but its contents are malformed.
    #[error("corrupt image data: {0}")]
    CorruptImage(String),

    /// The message does not fit the carrier's embedding capacity.
    /// Raised before any pixel is touched.
    #[error("message too large: need {needed} slots, carrier has {capacity}")]
    MessageTooLarge { needed: u64, capacity: u64 },

    /// No plausible hidden message was found. With an intact carrier this
    /// means the supplied secret does not match the one used to embed.
    #[error("no hidden message found (wrong secret or unmarked carrier)")]
    NoHiddenMessage,

    /// A message was framed correctly but its bytes are not valid text.
    #[error("hidden payload is not valid UTF-8")]
    CorruptPayload,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VeilError>;
