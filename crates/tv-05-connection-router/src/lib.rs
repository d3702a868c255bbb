//! # TV-05 Connection Router
//!
//! Chooses the store tier for an operating mode and opens a sanitized
//! connection handle for it.
//!
//! | Mode | Tier | URL |
//! |------|------|-----|
//! | `dev` | local | configured local URL |
//! | `normal` | server | configured server URL |
//! | `privacy` | browser | none |
//!
//! Parameters the mode's policy does not allow are dropped and logged by key
//! name. Resolution never fails because of them.

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    sanitize, ConnectionHandle, ConnectionParams, ModePolicy, ModePolicyTable, SanitizedParams,
    DEFAULT_LOCAL_STORE_URL, DEFAULT_SERVER_STORE_URL,
};
pub use error::ConnectionError;
pub use metrics::{RouterStats, RouterStatsSnapshot};
pub use ports::ConnectionRouterApi;
pub use service::ConnectionRouter;
