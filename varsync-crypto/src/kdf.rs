//! Key derivation from the master password.
//!
//! PBKDF2-HMAC-SHA256 with a deliberately high iteration count. The same
//! primitive serves both derivation paths — the server-facing verification
//! hash and the vault master key — distinguished only by salt and output
//! length, so the two must always be called with the right constants.

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encoding::encode_base64;
use crate::error::{CryptoError, CryptoResult};

/// Production PBKDF2 iteration count. Slow enough to resist offline
/// brute force, still sub-second on current client hardware.
pub const PBKDF2_ITERATIONS: u32 = 600_000;

/// Output length of the verification-hash derivation (bytes).
pub const VERIFY_HASH_SIZE: usize = 8;

/// Output length of the call-local AES key derivation (AES-128, bytes).
pub const CIPHER_KEY_SIZE: usize = 16;

/// PBKDF2 parameters.
///
/// Every derivation takes these explicitly instead of baking the iteration
/// count in, so a future versioned record format can carry different
/// parameters without touching call sites. The stored wire formats do not
/// change with this; [`KdfParams::default`] is the production value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdfParams {
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
        }
    }
}

/// The vault master key: a derived base64 string held in client memory only.
///
/// Never serialized, never logged (Debug is redacted), zeroed on drop. The
/// cipher layer consumes it as text — it is key *material*, not a raw AES key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey(String);

impl MasterKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

/// Derives `out_len` bytes from a secret and salt via PBKDF2-HMAC-SHA256.
///
/// Pure: identical inputs always produce identical output. Empty secret or
/// salt is rejected outright — deriving from a degenerate input would defeat
/// the security property, so this fails loudly instead.
pub fn derive_bits(
    secret: &str,
    salt: &str,
    out_len: usize,
    params: &KdfParams,
) -> CryptoResult<Vec<u8>> {
    if secret.is_empty() {
        return Err(CryptoError::InvalidInput("empty secret".into()));
    }
    if salt.is_empty() {
        return Err(CryptoError::InvalidInput("empty salt".into()));
    }
    if params.iterations == 0 {
        return Err(CryptoError::KeyDerivation("zero iteration count".into()));
    }

    let mut out = vec![0u8; out_len];
    pbkdf2_hmac::<Sha256>(secret.as_bytes(), salt.as_bytes(), params.iterations, &mut out);
    Ok(out)
}

/// Derives the server-facing verification hash: base64 of the 8-byte
/// derivation, salted by a stable user-scoped string (the account email).
///
/// This is the only derivation output that ever crosses the network.
pub fn verification_hash(password: &str, salt: &str, params: &KdfParams) -> CryptoResult<String> {
    let bits = derive_bits(password, salt, VERIFY_HASH_SIZE, params)?;
    Ok(encode_base64(&bits))
}

/// Derives the vault master key, salted by the project's vault salt.
///
/// Same primitive and output length as [`verification_hash`], but the salt
/// binds it to the project instead of the user — the two outputs are
/// unrelated and the master key never leaves the client.
pub fn derive_master_key(
    password: &str,
    vault_salt: &str,
    params: &KdfParams,
) -> CryptoResult<MasterKey> {
    let mut bits = derive_bits(password, vault_salt, VERIFY_HASH_SIZE, params)?;
    let key = MasterKey::new(encode_base64(&bits));
    bits.zeroize();
    Ok(key)
}
