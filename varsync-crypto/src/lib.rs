//! Client-side vault encryption for Varsync.
//!
//! Provides the cryptographic core of the vault using:
//! - PBKDF2-HMAC-SHA256 for key derivation from the master password
//! - AES-128-GCM for authenticated encryption of property values
//! - Secure key handling with zeroization
//!
//! # Architecture
//!
//! One KDF primitive feeds two derivation paths that must never be confused:
//!
//! 1. **Verification hash**: an 8-byte derivation salted by the account
//!    email, base64-encoded and sent to the server for password checks.
//!    The server only ever sees this hash, never the password itself.
//!
//! 2. **Master key**: an 8-byte derivation salted by the project's vault
//!    salt (the tail of the stored [`MasterPasswordRecord`]). The resulting
//!    base64 string is the master key. It stays in client memory and
//!    parameterizes every property encryption.
//!
//! Property values are encrypted under a *call-local* AES-128 key derived
//! from the master-key string and a fresh random salt, so raw AES keys are
//! never reused across values. Each ciphertext blob embeds its own salt and
//! nonce: `base64( salt[16] || nonce[12] || ciphertext+tag )`.

mod access;
mod cipher;
mod encoding;
mod error;
mod kdf;
mod record;

pub use access::{unwrap_master_key, wrap_master_key, WrappedMasterKey, ACCESS_KEY_SIZE};
pub use cipher::{
    decrypt_value, encrypt_value, MIN_BLOB_SIZE, NONCE_SIZE, SALT_SIZE, TAG_SIZE,
};
pub use encoding::{decode_base64, encode_base64};
pub use error::{CryptoError, CryptoResult};
pub use kdf::{
    derive_bits, derive_master_key, verification_hash, KdfParams, MasterKey, CIPHER_KEY_SIZE,
    PBKDF2_ITERATIONS, VERIFY_HASH_SIZE,
};
pub use record::{
    generate_vault_salt, MasterPasswordRecord, HASH_SEGMENT_LEN, RECORD_LEN, SALT_SEGMENT_LEN,
};
