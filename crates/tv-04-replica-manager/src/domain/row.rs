//! Encrypted replica rows.
//!
//! Row bodies are JSON, sealed with XChaCha20-Poly1305 under the tenant's
//! obfuscation key. Backends only ever see ciphertext.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_crypto::{decrypt, encrypt, Nonce, ObfuscationKey};
use shared_types::Bitmap;

use crate::error::ReplicaError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObfuscatedCardRow {
    pub card_bitmap: Bitmap,
    pub tag_bitmaps: Vec<Bitmap>,
    pub checksum: String,
    pub sync_version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObfuscatedTagRow {
    pub tag_bitmap: Bitmap,
    pub checksum: String,
    pub card_count: u64,
    pub sync_version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRow {
    pub value: String,
    /// Unix milliseconds.
    pub updated_at: u64,
}

/// Sealed row body as stored by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRow {
    pub nonce: Nonce,
    pub ciphertext: Vec<u8>,
}

impl EncryptedRow {
    pub fn seal<T: Serialize>(key: &ObfuscationKey, body: &T) -> Result<Self, ReplicaError> {
        let plaintext = serde_json::to_vec(body).map_err(|e| ReplicaError::Encoding(e.to_string()))?;
        let (ciphertext, nonce) = encrypt(key, &plaintext)?;
        Ok(Self { nonce, ciphertext })
    }

    pub fn open<T: DeserializeOwned>(&self, key: &ObfuscationKey) -> Result<T, ReplicaError> {
        let plaintext = decrypt(key, &self.ciphertext, &self.nonce)?;
        serde_json::from_slice(&plaintext).map_err(|e| ReplicaError::Encoding(e.to_string()))
    }

    /// `nonce || ciphertext`, for byte-oriented backends.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.nonce.as_bytes().len() + self.ciphertext.len());
        out.extend_from_slice(self.nonce.as_bytes());
        out.extend_from_slice(&self.ciphertext);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplicaError> {
        let nonce_len = shared_crypto::symmetric::NONCE_LEN;
        if bytes.len() < nonce_len {
            return Err(ReplicaError::Encoding(format!(
                "row shorter than nonce: {} bytes",
                bytes.len()
            )));
        }
        let (nonce, ciphertext) = bytes.split_at(nonce_len);
        Ok(Self {
            nonce: Nonce::from_slice(nonce)?,
            ciphertext: ciphertext.to_vec(),
        })
    }
}
