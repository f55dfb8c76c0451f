//! Vault crypto error types.

use thiserror::Error;

/// Result type for vault crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in vault crypto operations.
///
/// Corruption errors (`UndersizedBlob`, `Encoding`, `MalformedRecord`) are
/// deliberately distinct from `Decryption`: a damaged blob should surface as
/// a data error, while an authentication failure should send the caller back
/// to the master-password prompt.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed (wrong key or tampered data)")]
    Decryption,

    #[error("ciphertext blob too short: expected at least {min} bytes, got {actual}")]
    UndersizedBlob { min: usize, actual: usize },

    #[error("base64 decoding failed: {0}")]
    Encoding(String),

    #[error("malformed master password record: {0}")]
    MalformedRecord(String),
}
