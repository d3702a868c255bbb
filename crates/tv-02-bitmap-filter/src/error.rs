//! Error types for the bitmap filter subsystem

use shared_types::{Categorized, ErrorKind, FilterKind, TenantKeyError};
use thiserror::Error;

/// Errors that can occur while filtering.
///
/// Everything except `SourceUnavailable` is a caller mistake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("{kind} filter requires at least one bitmap")]
    EmptyBitmapSet { kind: FilterKind },

    #[error("invalid expression at byte {position}: {reason}")]
    InvalidExpression { position: usize, reason: String },

    #[error("invalid tenant: {0}")]
    InvalidTenant(#[from] TenantKeyError),

    #[error("malformed filter request: {0}")]
    MalformedRequest(String),

    #[error("card bitmap source unavailable: {0}")]
    SourceUnavailable(String),
}

impl FilterError {
    pub(crate) fn expression(position: usize, reason: impl Into<String>) -> Self {
        Self::InvalidExpression {
            position,
            reason: reason.into(),
        }
    }
}

impl Categorized for FilterError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceUnavailable(_) => ErrorKind::Connectivity,
            _ => ErrorKind::Validation,
        }
    }
}
