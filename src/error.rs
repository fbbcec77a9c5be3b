//! Error types surfaced by the AEAD and XOF layers.
//!
//! Per the secret-hygiene contract, only the authentication-failure kind is a
//! recoverable [`Result`]; caller misuse (squeezing after `free`, absorbing
//! after a mode transitioned to squeeze, ...) is an invariant violation and is
//! enforced with `debug_assert!` rather than returned as an error — a
//! `Result` is reserved for violations an honest caller can hit at runtime
//! (a forged tag), not a programming bug (calling the API out of order).

use thiserror::Error;

/// Errors produced by [`crate::siv`] encryption/decryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AeadError {
    /// The ciphertext passed to `siv_decrypt` is shorter than the tag.
    #[error("ciphertext shorter than the {tag_len}-byte authentication tag")]
    CiphertextTooShort {
        /// Length, in bytes, of the authentication tag (16 for ASCON-80pq-SIV).
        tag_len: usize,
    },
    /// The recomputed tag does not match the tag carried in the ciphertext.
    #[error("authentication tag mismatch")]
    InvalidTag,
}

/// Errors produced when constructing a fixed-output-length XOF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum XofError {
    /// The requested output length cannot be encoded in the IV (it would
    /// collide with the encoding reserved for arbitrary-length output).
    ///
    /// See `DESIGN.md` for the open-question decision this resolves: the
    /// reference implementation silently falls back to arbitrary-length
    /// behaviour here, this crate instead surfaces it.
    #[error("fixed output length {requested} bytes exceeds the {max} byte limit encodable in the IV")]
    OutputLengthTooLarge {
        /// The length, in bytes, the caller requested.
        requested: usize,
        /// The largest length, in bytes, that can be encoded (2^29 - 1).
        max: usize,
    },
}
