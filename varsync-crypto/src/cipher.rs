//! Authenticated encryption of property values.
//!
//! AES-128-GCM under a call-local key. The master key is consumed as a text
//! secret: every encryption draws a fresh random salt, derives a one-off
//! AES key from `(secret, salt)` via PBKDF2, and embeds the salt in the
//! output so decryption can re-derive the same key. Raw AES keys are never
//! reused across values.
//!
//! Blob layout, stable for interoperability:
//!
//! ```text
//! base64( salt[16] | nonce[12] | ciphertext+tag[N] )   with N >= 16
//! ```
//!
//! Nonce reuse under one key breaks GCM completely, so both salt and nonce
//! come from the OS RNG on every call and are never cached or derived.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes128Gcm, KeyInit, Nonce};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::encoding::{decode_base64, encode_base64};
use crate::error::{CryptoError, CryptoResult};
use crate::kdf::{KdfParams, CIPHER_KEY_SIZE};

/// Per-call KDF salt length embedded at the front of every blob.
pub const SALT_SIZE: usize = 16;

/// AES-GCM nonce length (96 bit, the standard recommendation).
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag length appended to the ciphertext.
pub const TAG_SIZE: usize = 16;

/// Smallest well-formed blob: salt + nonce + tag of an empty plaintext.
/// Anything shorter is corruption and is rejected before any slicing.
pub const MIN_BLOB_SIZE: usize = SALT_SIZE + NONCE_SIZE + TAG_SIZE;

/// Derives the call-local AES-128 key from the text secret and a blob salt.
fn cipher_key(
    secret: &str,
    salt: &[u8],
    params: &KdfParams,
) -> CryptoResult<Zeroizing<[u8; CIPHER_KEY_SIZE]>> {
    if secret.is_empty() {
        return Err(CryptoError::InvalidInput("empty secret".into()));
    }
    if params.iterations == 0 {
        return Err(CryptoError::KeyDerivation("zero iteration count".into()));
    }

    let mut key = Zeroizing::new([0u8; CIPHER_KEY_SIZE]);
    pbkdf2_hmac::<Sha256>(secret.as_bytes(), salt, params.iterations, &mut key[..]);
    Ok(key)
}

/// Encrypts a plaintext string under a text secret (the master key or an
/// access key), returning the self-contained base64 blob.
pub fn encrypt_value(plaintext: &str, secret: &str, params: &KdfParams) -> CryptoResult<String> {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);

    let key = cipher_key(secret, &salt, params)?;
    let cipher = Aes128Gcm::new_from_slice(&key[..])
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|_| CryptoError::Encryption("AEAD encryption failed".into()))?;

    let mut blob = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend(ciphertext);
    Ok(encode_base64(&blob))
}

/// Decrypts a blob produced by [`encrypt_value`] with the same text secret.
///
/// A blob that is not valid base64 or decodes to fewer than
/// [`MIN_BLOB_SIZE`] bytes is a corruption error. An authentication failure
/// (wrong secret or tampered bytes) is [`CryptoError::Decryption`] — no
/// plaintext is ever produced from unauthenticated data.
pub fn decrypt_value(blob: &str, secret: &str, params: &KdfParams) -> CryptoResult<String> {
    let bytes = decode_base64(blob)?;
    if bytes.len() < MIN_BLOB_SIZE {
        return Err(CryptoError::UndersizedBlob {
            min: MIN_BLOB_SIZE,
            actual: bytes.len(),
        });
    }

    let (salt, rest) = bytes.split_at(SALT_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let key = cipher_key(secret, salt, params)?;
    let cipher = Aes128Gcm::new_from_slice(&key[..])
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CryptoError::Decryption)?;

    String::from_utf8(plaintext)
        .map_err(|_| CryptoError::Encoding("decrypted value is not valid UTF-8".into()))
}
