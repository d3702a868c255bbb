//! # TV-03 Bitmap Sync
//!
//! Server-side intake of opaque card and tag bitmaps from the client tier.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): payload validation, checksums, snapshots
//! - **Ports Layer** (`ports/`): `BitmapSyncApi` (driving), `BitmapStore` (driven)
//! - **Service Layer** (`service`): `BitmapSyncService`
//! - **Adapters Layer** (`adapters/`): in-memory store, filter-engine card source
//! - **Handler Layer** (`handler`): `SyncResult` / `QueryResult` conversion
//!
//! ## Privacy Boundary
//!
//! A payload carrying any of `name`, `description`, `content`, `title` or
//! `color` is rejected before any other check, and nothing is stored. Only
//! the exact required keys are accepted.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod handler;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::InMemoryBitmapStore;
pub use domain::{
    card_checksum, tag_checksum, BitmapSnapshot, CardBitmapPayload, SyncReceipt, TagBitmapPayload,
};
pub use error::{StoreError, SyncError};
pub use handler::SyncHandler;
pub use ports::{BitmapStore, BitmapSyncApi};
pub use service::{BitmapSyncService, SyncStats, SyncStatsSnapshot};
