//! # Shared Crypto
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `keys` | SHA-256, HMAC-SHA256 | Per-tenant obfuscation keys, keyed fingerprints |
//! | `hashing` | SHA-256 | Content-free integrity digests |
//! | `symmetric` | XChaCha20-Poly1305 | Replica row encryption |
//!
//! ## Security Properties
//!
//! - **Obfuscation keys** are derived, never stored: the same server secret
//!   and tenant always yield the same key, so no state survives a restart.
//! - **Fingerprints** are one-way and domain separated (`card:` / `tag:`).
//! - **Key material** is zeroized on drop.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod keys;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{sha256, sha256_hex};
pub use keys::{ObfuscationKey, FINGERPRINT_MASK};
pub use symmetric::{decrypt, encrypt, Nonce};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
