//! Domain Layer
//!
//! Obfuscation, replica schema, encrypted rows and retry policy. No I/O.

pub mod config;
pub mod obfuscation;
pub mod replica;
pub mod retry;
pub mod row;
pub mod schema;

pub use config::ReplicaConfig;
pub use replica::{BrowserSnapshot, ReplicaHandle, SyncSummary};
pub use retry::{RetryJob, RetryPolicy};
pub use row::{EncryptedRow, MetadataRow, ObfuscatedCardRow, ObfuscatedTagRow};
pub use schema::{RowKey, Table, LAST_SYNC_AT, SYNC_VERSION};
