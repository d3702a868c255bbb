//! Error types for the connection router

use shared_types::{Categorized, ConnectionType, ErrorKind, OperatingMode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// A server or local policy was configured without a store URL.
    #[error("no store URL configured for {mode} mode ({connection_type} connection)")]
    MissingStoreUrl {
        mode: OperatingMode,
        connection_type: ConnectionType,
    },
}

impl Categorized for ConnectionError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingStoreUrl { .. } => ErrorKind::Validation,
        }
    }
}
