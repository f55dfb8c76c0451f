//! Vault session error types.

use thiserror::Error;

/// Result type for vault session operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors that can occur in vault session operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// No master key is available — the caller should start the
    /// master-password prompt flow, never retry with the same inputs.
    #[error("vault is locked")]
    Locked,

    #[error("master password is incorrect")]
    InvalidPassword,

    #[error("invalid property: {0}")]
    InvalidProperty(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("background task failed: {0}")]
    Task(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("crypto error: {0}")]
    Crypto(#[from] varsync_crypto::CryptoError),
}
