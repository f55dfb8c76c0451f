//! The stored master-password record.
//!
//! One record per project, persisted server-side as a single string:
//!
//! ```text
//! verification_hash[12 chars] || vault_salt[24 chars]
//! ```
//!
//! The hash segment is the base64 of the 8-byte PBKDF2 derivation salted by
//! the account email — what the client submits for verification. The salt
//! segment is the base64 of 16 random bytes, generated once at vault
//! initialization; its only purpose is to salt the master-key derivation.
//! The salt is always the last fixed-width segment, so a record plus the
//! user's credentials is all that is needed to re-verify.
//!
//! The record itself is a KDF output and safe to store like a password hash;
//! it is created when a project's vault is first initialized and immutable
//! thereafter.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::encoding::{decode_base64, encode_base64};
use crate::error::{CryptoError, CryptoResult};
use crate::kdf::{verification_hash, KdfParams, VERIFY_HASH_SIZE};

/// Width of the hash segment: 8 bytes, base64-encoded with padding.
pub const HASH_SEGMENT_LEN: usize = 12;

/// Width of the salt segment: 16 bytes, base64-encoded with padding.
pub const SALT_SEGMENT_LEN: usize = 24;

/// Total record width.
pub const RECORD_LEN: usize = HASH_SEGMENT_LEN + SALT_SEGMENT_LEN;

/// Number of random bytes behind the salt segment.
const VAULT_SALT_SIZE: usize = 16;

/// Generates a fresh vault salt: 16 random bytes, base64-encoded.
pub fn generate_vault_salt() -> String {
    let mut bytes = [0u8; VAULT_SALT_SIZE];
    OsRng.fill_bytes(&mut bytes);
    encode_base64(&bytes)
}

/// A parsed, width-validated master-password record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MasterPasswordRecord(String);

impl MasterPasswordRecord {
    /// Creates the record for a new vault: derives the verification hash
    /// from the password and email, appends a freshly generated vault salt.
    pub fn create(password: &str, email: &str, params: &KdfParams) -> CryptoResult<Self> {
        let hash = verification_hash(password, email, params)?;
        Self::compose(&hash, &generate_vault_salt())
    }

    /// Composes a record from its two segments, validating both.
    pub fn compose(hash: &str, vault_salt: &str) -> CryptoResult<Self> {
        Self::parse(format!("{hash}{vault_salt}"))
    }

    /// Parses and validates a stored record string.
    ///
    /// Both segments must have their exact fixed widths and decode as
    /// base64 to 8 and 16 bytes respectively; anything else is a
    /// [`CryptoError::MalformedRecord`].
    pub fn parse(record: impl Into<String>) -> CryptoResult<Self> {
        let record = record.into();
        if record.len() != RECORD_LEN {
            return Err(CryptoError::MalformedRecord(format!(
                "expected {RECORD_LEN} characters, got {}",
                record.len()
            )));
        }
        if !record.is_ascii() {
            return Err(CryptoError::MalformedRecord(
                "record contains non-ASCII characters".into(),
            ));
        }

        let (hash, salt) = record.split_at(HASH_SEGMENT_LEN);
        let hash_bytes = decode_base64(hash)
            .map_err(|_| CryptoError::MalformedRecord("hash segment is not base64".into()))?;
        if hash_bytes.len() != VERIFY_HASH_SIZE {
            return Err(CryptoError::MalformedRecord(format!(
                "hash segment decodes to {} bytes, expected {VERIFY_HASH_SIZE}",
                hash_bytes.len()
            )));
        }
        let salt_bytes = decode_base64(salt)
            .map_err(|_| CryptoError::MalformedRecord("salt segment is not base64".into()))?;
        if salt_bytes.len() != VAULT_SALT_SIZE {
            return Err(CryptoError::MalformedRecord(format!(
                "salt segment decodes to {} bytes, expected {VAULT_SALT_SIZE}",
                salt_bytes.len()
            )));
        }

        Ok(Self(record))
    }

    /// The verification-hash segment (what the server compares).
    pub fn verification_hash(&self) -> &str {
        &self.0[..HASH_SEGMENT_LEN]
    }

    /// The vault-salt segment (what salts the master-key derivation).
    pub fn vault_salt(&self) -> &str {
        &self.0[HASH_SEGMENT_LEN..]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Self-contained verification: re-derives the hash from the password
    /// and email and compares it to the stored segment, the same string
    /// equality the server applies.
    pub fn verify(&self, password: &str, email: &str, params: &KdfParams) -> CryptoResult<bool> {
        let hash = verification_hash(password, email, params)?;
        Ok(hash == self.verification_hash())
    }
}

impl fmt::Display for MasterPasswordRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MasterPasswordRecord {
    type Error = CryptoError;

    fn try_from(value: String) -> CryptoResult<Self> {
        Self::parse(value)
    }
}

impl From<MasterPasswordRecord> for String {
    fn from(record: MasterPasswordRecord) -> Self {
        record.0
    }
}
