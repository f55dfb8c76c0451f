//! The property model: plain and encrypted values.
//!
//! A property's stored value is either a literal string/boolean or, when
//! `isEncrypted` is set, an opaque ciphertext blob. The flag and the blob
//! must always agree: a property marked encrypted decrypts under the
//! correct master key, and a malformed blob is corruption, never a
//! wrong-password condition. Switching between the two states is an
//! explicit, user-triggered transform — never a side effect.

use serde::{Deserialize, Serialize};

use varsync_crypto::{decrypt_value, encrypt_value, KdfParams, MasterKey};

use crate::error::{VaultError, VaultResult};

/// A property value as persisted: a string or a feature-flag boolean.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Toggle(bool),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Toggle(value)
    }
}

/// A vault property as stored per environment. The storage layer treats
/// `value` as opaque; only the client interprets encrypted blobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub value: PropertyValue,
    pub is_encrypted: bool,
}

impl Property {
    pub fn plain(value: impl Into<PropertyValue>) -> Self {
        Self {
            value: value.into(),
            is_encrypted: false,
        }
    }
}

/// Encrypts a plain text property, flipping its flag.
///
/// Only string values can be encrypted; feature-flag booleans stay plain.
pub fn encrypt_property(
    prop: &Property,
    key: &MasterKey,
    params: &KdfParams,
) -> VaultResult<Property> {
    if prop.is_encrypted {
        return Err(VaultError::InvalidProperty("value is already encrypted".into()));
    }
    let PropertyValue::Text(plain) = &prop.value else {
        return Err(VaultError::InvalidProperty("boolean values cannot be encrypted".into()));
    };

    let blob = encrypt_value(plain, key.as_str(), params)?;
    Ok(Property {
        value: PropertyValue::Text(blob),
        is_encrypted: true,
    })
}

/// Decrypts an encrypted property back to plain text, flipping its flag.
pub fn decrypt_property(
    prop: &Property,
    key: &MasterKey,
    params: &KdfParams,
) -> VaultResult<Property> {
    let blob = encrypted_blob(prop)?;
    let plain = decrypt_value(blob, key.as_str(), params)?;
    Ok(Property {
        value: PropertyValue::Text(plain),
        is_encrypted: false,
    })
}

/// Toggles a property between plain and encrypted.
pub fn toggle_encryption(
    prop: &Property,
    key: &MasterKey,
    params: &KdfParams,
) -> VaultResult<Property> {
    if prop.is_encrypted {
        decrypt_property(prop, key, params)
    } else {
        encrypt_property(prop, key, params)
    }
}

/// Decrypts an encrypted property for display, without mutating it.
pub fn reveal(prop: &Property, key: &MasterKey, params: &KdfParams) -> VaultResult<String> {
    let blob = encrypted_blob(prop)?;
    Ok(decrypt_value(blob, key.as_str(), params)?)
}

fn encrypted_blob(prop: &Property) -> VaultResult<&str> {
    if !prop.is_encrypted {
        return Err(VaultError::InvalidProperty("value is plain text".into()));
    }
    match &prop.value {
        PropertyValue::Text(blob) => Ok(blob),
        PropertyValue::Toggle(_) => Err(VaultError::InvalidProperty(
            "boolean value marked as encrypted".into(),
        )),
    }
}
