//! Error types for the platform client and the field codec.
//!
//! # Design
//! The two envelope decode failures get dedicated variants because they point
//! at different culprits: `EnvelopeDecode` means the response body itself was
//! not JSON, while `NestedDecode` means the outer envelope was fine but the
//! `data` member carried a broken inner document — a remote-side bug worth
//! distinguishing when diagnosing partial envelopes.

use thiserror::Error;

/// Errors surfaced by [`crate::client::Client`] and the transport layer.
///
/// Nothing is retried or recovered locally; every failure propagates to the
/// direct caller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected at construction: the supplied credentials are unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Network-level failure reported by the transport collaborator.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status. Raw body preserved.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body is not valid JSON.
    #[error("response envelope is not valid JSON: {0}")]
    EnvelopeDecode(String),

    /// The envelope's `data` member is a string but not a valid JSON document.
    #[error("envelope `data` is not valid JSON: {0}")]
    NestedDecode(String),

    /// The request payload could not be serialized to JSON.
    #[error("request serialization failed: {0}")]
    Serialization(String),
}

/// Errors from [`crate::crypto::FieldCipher`].
///
/// Decryption never falls through to garbage plaintext: every malformed
/// input maps to one of these variants.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The shared secret is not exactly 32 bytes.
    #[error("shared secret must be exactly 32 bytes, got {0}")]
    SecretLength(usize),

    /// The ciphertext is not valid Base64.
    #[error("ciphertext is not valid Base64: {0}")]
    Base64(String),

    /// The decoded ciphertext length is not a positive multiple of the AES
    /// block size.
    #[error("ciphertext length {0} is not a positive multiple of 16")]
    BlockLength(usize),

    /// PKCS#7 padding validation failed after decryption.
    #[error("padding validation failed")]
    Padding,

    /// The decrypted bytes are not valid UTF-8.
    #[error("decrypted plaintext is not valid UTF-8: {0}")]
    Utf8(String),
}
