//! # Error Types
//!
//! The error taxonomy shared by all subsystems. Each subsystem keeps its own
//! `thiserror` enum and classifies it through [`Categorized`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error categories surfaced to callers and audit logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Missing or malformed required field.
    Validation,
    /// A forbidden content field was present.
    PrivacyViolation,
    /// Operation attempted against a mismatched tenant.
    TenantIsolation,
    /// Replica, cloud or store unreachable.
    Connectivity,
    /// Operation exceeded its deadline.
    Timeout,
}

impl ErrorKind {
    /// Privacy and isolation errors always abort the call and are never
    /// downgraded or retried.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PrivacyViolation | Self::TenantIsolation)
    }

    /// Errors the replica sync path queues for retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity | Self::Timeout)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "ValidationError",
            Self::PrivacyViolation => "PrivacyViolationError",
            Self::TenantIsolation => "TenantIsolationError",
            Self::Connectivity => "ConnectivityError",
            Self::Timeout => "Timeout",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every subsystem error enum.
pub trait Categorized {
    fn kind(&self) -> ErrorKind;
}

/// Invalid tenant key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TenantKeyError {
    #[error("tenant key has an empty user id")]
    EmptyUserId,

    #[error("tenant key has an empty workspace id")]
    EmptyWorkspaceId,
}

impl Categorized for TenantKeyError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Unrecognised operating mode string (strict parse only).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised operating mode: {0:?}")]
pub struct ParseModeError(pub String);

/// A record or request carried a tenant other than the caller's.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tenant isolation violated: expected {expected}, found {found}")]
pub struct TenantMismatch {
    pub expected: String,
    pub found: String,
}

impl Categorized for TenantMismatch {
    fn kind(&self) -> ErrorKind {
        ErrorKind::TenantIsolation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_and_retryable_are_disjoint() {
        let kinds = [
            ErrorKind::Validation,
            ErrorKind::PrivacyViolation,
            ErrorKind::TenantIsolation,
            ErrorKind::Connectivity,
            ErrorKind::Timeout,
        ];
        for kind in kinds {
            assert!(!(kind.is_fatal() && kind.is_retryable()), "{kind}");
        }
        assert!(ErrorKind::PrivacyViolation.is_fatal());
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(!ErrorKind::Validation.is_retryable());
    }
}
