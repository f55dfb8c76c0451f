//! Vault session layer for Varsync.
//!
//! Sits between the UI and the crypto core:
//! - [`MasterKeySession`] holds the session's master password and derived
//!   master key in memory only, re-deriving reactively when the password or
//!   the project's vault salt changes
//! - the property model and its plain ↔ encrypted transforms
//! - the master-password endpoint contract and its HTTP client
//!
//! The master key never leaves this process: it is never persisted, logged,
//! or put in a request body. The server only ever sees the verification
//! hash. The slow PBKDF2 derivation runs on the blocking pool, and while a
//! derivation is in flight the session reads as locked — a reader can never
//! observe a key derived from a superseded password/salt pairing.

pub mod api;
pub mod config;
pub mod error;
pub mod property;
pub mod session;

pub use api::{ActionResponse, MasterPasswordEndpoint, VarsyncApiClient};
pub use config::VaultConfig;
pub use error::{VaultError, VaultResult};
pub use property::{
    decrypt_property, encrypt_property, reveal, toggle_encryption, Property, PropertyValue,
};
pub use session::MasterKeySession;
