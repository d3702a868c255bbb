//! Error types for the query router

use shared_types::{Categorized, ConnectionType, ErrorKind, TenantKeyError, TenantMismatch};
use thiserror::Error;
use tv_02_bitmap_filter::FilterError;
use tv_05_connection_router::ConnectionError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("at least one bitmap operation is required")]
    NoOperations,

    #[error("invalid tenant: {0}")]
    InvalidTenant(#[from] TenantKeyError),

    #[error(transparent)]
    TenantIsolation(#[from] TenantMismatch),

    #[error("bitmap phase failed: {0}")]
    Filter(#[from] FilterError),

    #[error("connection: {0}")]
    Connection(#[from] ConnectionError),

    #[error("{0} tier: {1}")]
    Tier(ConnectionType, TierError),

    #[error("no {0} tier configured")]
    TierNotConfigured(ConnectionType),

    #[error("{tier} tier did not answer within {after_ms} ms")]
    Timeout { tier: ConnectionType, after_ms: u64 },
}

impl Categorized for QueryError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NoOperations | Self::InvalidTenant(_) => ErrorKind::Validation,
            Self::TenantIsolation(_) => ErrorKind::TenantIsolation,
            Self::Filter(e) => e.kind(),
            Self::Connection(e) => e.kind(),
            Self::Tier(_, e) => e.kind(),
            Self::TierNotConfigured(_) => ErrorKind::Connectivity,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }
}

/// Errors reported by content tier adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TierError {
    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("{0} is not supported by this tier")]
    Unsupported(&'static str),

    #[error("bitmap evaluation: {0}")]
    Filter(#[from] FilterError),
}

impl Categorized for TierError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Unavailable(_) => ErrorKind::Connectivity,
            Self::Unsupported(_) => ErrorKind::Validation,
            Self::Filter(e) => e.kind(),
        }
    }
}
