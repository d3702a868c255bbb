//! # SHA-256 Hashing
//!
//! Unkeyed digests. Used for bitmap-record checksums on the server tier, where
//! the input is already opaque.

use sha2::{Digest, Sha256};

/// 256-bit digest.
pub type Hash = [u8; 32];

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Lower-case hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}
