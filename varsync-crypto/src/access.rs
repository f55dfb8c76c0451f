//! Master-key wrapping for headless access keys.
//!
//! CI jobs and SDKs authenticate with a random access key instead of the
//! master password. The vault master key is encrypted under that access key,
//! so the server stores only the resulting blob: knowing the access key is
//! the only way to recover the master key, and the server can do neither.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::cipher::{decrypt_value, encrypt_value};
use crate::encoding::encode_base64;
use crate::error::CryptoResult;
use crate::kdf::{KdfParams, MasterKey};

/// Raw access-key length in bytes (base64-encoded before use).
pub const ACCESS_KEY_SIZE: usize = 32;

/// A freshly issued access key together with the master key sealed under it.
///
/// The access key is shown to the user exactly once; only `wrapped` is
/// persisted.
pub struct WrappedMasterKey {
    pub access_key: String,
    pub wrapped: String,
}

/// Generates a random access key and seals the master key under it.
pub fn wrap_master_key(
    master_key: &MasterKey,
    params: &KdfParams,
) -> CryptoResult<WrappedMasterKey> {
    let mut bytes = [0u8; ACCESS_KEY_SIZE];
    OsRng.fill_bytes(&mut bytes);
    let access_key = encode_base64(&bytes);

    let wrapped = encrypt_value(master_key.as_str(), &access_key, params)?;
    Ok(WrappedMasterKey {
        access_key,
        wrapped,
    })
}

/// Recovers the master key from a wrapped blob using the access key.
///
/// A wrong access key fails authentication like any other decryption.
pub fn unwrap_master_key(
    wrapped: &str,
    access_key: &str,
    params: &KdfParams,
) -> CryptoResult<MasterKey> {
    let plain = decrypt_value(wrapped, access_key, params)?;
    Ok(MasterKey::new(plain))
}
