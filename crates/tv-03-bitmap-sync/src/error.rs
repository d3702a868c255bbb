//! Error types for the bitmap sync subsystem

use shared_types::{Categorized, ErrorKind, TenantKeyError};
use thiserror::Error;

/// Sync rejections and store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Payload carried content keys. Field names only, never values.
    #[error("privacy violation: content fields {fields:?} are not accepted")]
    PrivacyViolation { fields: Vec<String> },

    #[error("missing required fields: {fields:?}")]
    MissingFields { fields: Vec<String> },

    #[error("unexpected fields: {fields:?}")]
    UnexpectedFields { fields: Vec<String> },

    #[error("invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("invalid tenant: {0}")]
    InvalidTenant(#[from] TenantKeyError),

    #[error("bitmap store error: {0}")]
    Store(#[from] StoreError),
}

impl SyncError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl Categorized for SyncError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::PrivacyViolation { .. } => ErrorKind::PrivacyViolation,
            Self::Store(e) => e.kind(),
            _ => ErrorKind::Validation,
        }
    }
}

/// Errors from bitmap store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store operation timed out")]
    Timeout,
}

impl Categorized for StoreError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Unavailable(_) => ErrorKind::Connectivity,
            Self::Timeout => ErrorKind::Timeout,
        }
    }
}
