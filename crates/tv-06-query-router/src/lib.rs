//! # TV-06 Query Router
//!
//! Entry point for reads. Picks the tier through the connection router and
//! keeps content on the caller's side of the trust boundary in privacy mode.
//!
//! ## Routing
//!
//! | Entry point | Privacy | Normal | Dev |
//! |-------------|---------|--------|-----|
//! | `route_content_query` | browser | server | local |
//! | `route_bitmap_operation` | server | server | server |
//! | `route_filtered_query` | server bitmaps, then browser content | server | local |
//!
//! ## Guarantees
//!
//! - Every returned record is checked against the caller's tenant; one
//!   foreign record fails the whole call with `TenantIsolation`.
//! - A failed bitmap phase resolves no content.
//! - The connection handle opened for a call is closed before it returns.
//! - Content tier calls are bounded by `QueryRouterConfig::timeout`.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::InMemoryContentTier;
pub use domain::{CompositeResult, QueryRouterConfig, DEFAULT_QUERY_TIMEOUT};
pub use error::{QueryError, TierError};
pub use handler::QueryHandler;
pub use metrics::{QueryMetrics, QueryMetricsSnapshot};
pub use ports::{ContentTier, QueryRouterApi};
pub use service::QueryRouter;
