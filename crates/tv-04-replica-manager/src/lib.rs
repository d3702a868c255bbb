//! # TV-04 Replica Manager
//!
//! Per-tenant replicas that mirror the browser tier as obfuscated bitmaps.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): obfuscation, row schema, encrypted rows, retry policy
//! - **Ports Layer** (`ports/`): `ReplicaManagerApi` (driving), `ReplicaBackend` and
//!   `ServerBitmapSink` (driven)
//! - **Service Layer** (`service/`): `ReplicaManager`
//! - **Adapters Layer** (`adapters/`): in-memory backend
//!
//! ## Guarantees
//!
//! | Property | Enforcement |
//! |----------|-------------|
//! | One replica per tenant, created once | `OnceCell` slot per tenant in `ReplicaManager` |
//! | Schema provisioned once per replica | `ensure_schema` runs inside the creation future |
//! | No content in replica rows | rows are built from `CardBitmapRecord` / `TagBitmapRecord` only |
//! | Rows unreadable without the tenant key | `EncryptedRow::seal` (XChaCha20-Poly1305) |
//! | No cross-tenant writes | snapshot owners checked before any I/O |
//!
//! ## Failure Handling
//!
//! ```text
//! sync ──ok──────────────→ SyncSummary
//!   │
//!   ├─ Connectivity/Timeout → RetryJob ──worker──→ backoff, rerun ──→ success | requeue | drop
//!   │
//!   └─ anything else ──────→ Err(ReplicaError)
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::InMemoryReplicaBackend;
pub use domain::{
    BrowserSnapshot, EncryptedRow, MetadataRow, ObfuscatedCardRow, ObfuscatedTagRow, ReplicaConfig,
    ReplicaHandle, RetryJob, RetryPolicy, RowKey, SyncSummary, Table,
};
pub use error::{BackendError, ReplicaError};
pub use metrics::{ReplicaMetrics, ReplicaMetricsSnapshot};
pub use ports::{ReplicaBackend, ReplicaManagerApi, RowWrite, ServerBitmapSink};
pub use service::ReplicaManager;
