//! Error types for the replica manager

use shared_crypto::CryptoError;
use shared_types::{Categorized, ErrorKind, TenantKeyError, TenantMismatch};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplicaError {
    #[error(transparent)]
    TenantIsolation(#[from] TenantMismatch),

    #[error("invalid tenant: {0}")]
    InvalidTenant(#[from] TenantKeyError),

    #[error("{operation} timed out after {after_ms} ms")]
    Timeout { operation: &'static str, after_ms: u64 },

    #[error("replica backend: {0}")]
    Backend(#[from] BackendError),

    #[error("row encryption: {0}")]
    Crypto(#[from] CryptoError),

    #[error("row encoding: {0}")]
    Encoding(String),
}

impl Categorized for ReplicaError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::TenantIsolation(_) => ErrorKind::TenantIsolation,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Backend(e) => e.kind(),
            Self::InvalidTenant(_) | Self::Crypto(_) | Self::Encoding(_) => ErrorKind::Validation,
        }
    }
}

/// Errors from replica backends and the server bitmap sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("timed out")]
    Timeout,

    /// The remote side refused the data; retrying will not help.
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("replica not found: {0}")]
    UnknownReplica(String),
}

impl Categorized for BackendError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Unavailable(_) => ErrorKind::Connectivity,
            Self::Timeout => ErrorKind::Timeout,
            Self::Rejected(_) | Self::UnknownReplica(_) => ErrorKind::Validation,
        }
    }
}
