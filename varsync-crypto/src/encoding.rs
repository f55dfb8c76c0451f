//! Base64 helpers for values crossing a serialization boundary.
//!
//! Standard alphabet with padding, matching what the stored hash record and
//! ciphertext blobs use. Decode failures map to [`CryptoError::Encoding`] —
//! the corruption side of the error taxonomy, never a decryption failure.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CryptoError, CryptoResult};

/// Encodes bytes as padded standard base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes padded standard base64, surfacing failures as corruption errors.
pub fn decode_base64(text: &str) -> CryptoResult<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| CryptoError::Encoding(e.to_string()))
}
