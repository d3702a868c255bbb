//! # Obfuscation Keys
//!
//! `key = SHA-256(server_secret || user_id || 0x1F || workspace_id)`
//!
//! The unit separator keeps `("ab", "c")` and `("a", "bc")` apart. Keys are
//! recomputed on demand; nothing is persisted.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// Fingerprints are folded into 53 bits, the widest integer a browser client
/// holds exactly as a plain number.
pub const FINGERPRINT_MASK: u64 = (1 << 53) - 1;

const SEPARATOR: u8 = 0x1F;

/// Per-tenant 256-bit obfuscation key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ObfuscationKey([u8; 32]);

impl ObfuscationKey {
    /// Derive the key for a tenant.
    pub fn derive(server_secret: &[u8], user_id: &str, workspace_id: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(server_secret);
        hasher.update(user_id.as_bytes());
        hasher.update([SEPARATOR]);
        hasher.update(workspace_id.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// HMAC-SHA256 over the given parts, each followed by the separator.
    pub fn mac(&self, parts: &[&[u8]]) -> [u8; 32] {
        let mut mac =
            HmacSha256::new_from_slice(&self.0).expect("HMAC key size is always valid");
        for part in parts {
            mac.update(part);
            mac.update(&[SEPARATOR]);
        }
        mac.finalize().into_bytes().into()
    }

    /// Stable 53-bit fingerprint of `id` within `domain` (`"card"`, `"tag"`).
    pub fn fingerprint(&self, domain: &str, id: &str) -> u64 {
        let digest = self.mac(&[domain.as_bytes(), id.as_bytes()]);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(head) & FINGERPRINT_MASK
    }

    /// Lower-case hex MAC; used for content checksums.
    pub fn mac_hex(&self, parts: &[&[u8]]) -> String {
        hex::encode(self.mac(parts))
    }
}

impl fmt::Debug for ObfuscationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ObfuscationKey(<redacted>)")
    }
}
