//! # Outbound Ports (Driven Ports)
//!
//! - `ReplicaBackend`: the embedded, cloud-replicated store
//!   (production: `RocksDbReplicaBackend` in tagvault-runtime;
//!   testing: `InMemoryReplicaBackend`)
//! - `ServerBitmapSink`: forwards obfuscated bitmaps to the server tier

use async_trait::async_trait;
use shared_types::{CardBitmapRecord, TagBitmapRecord, TenantKey};

use crate::domain::{EncryptedRow, RowKey, Table};
use crate::error::BackendError;

/// One operation of an atomic row batch.
#[derive(Debug, Clone)]
pub enum RowWrite {
    Put { key: RowKey, row: EncryptedRow },
    Delete { key: RowKey },
}

impl RowWrite {
    pub fn put(key: RowKey, row: EncryptedRow) -> Self {
        RowWrite::Put { key, row }
    }

    pub fn delete(key: RowKey) -> Self {
        RowWrite::Delete { key }
    }
}

#[async_trait]
pub trait ReplicaBackend: Send + Sync {
    /// Create the physical replica for `tenant`, returning its location.
    async fn create_replica(&self, tenant: &TenantKey) -> Result<String, BackendError>;

    /// Create any of `tables` that do not exist yet.
    async fn ensure_schema(&self, location: &str, tables: &[Table]) -> Result<(), BackendError>;

    /// Apply every write or none of them.
    async fn write_rows(&self, location: &str, writes: Vec<RowWrite>) -> Result<(), BackendError>;

    async fn read_row(&self, location: &str, key: &RowKey) -> Result<Option<EncryptedRow>, BackendError>;

    /// Replicate local changes to the cloud copy.
    async fn push_to_cloud(&self, location: &str) -> Result<(), BackendError>;
}

#[async_trait]
pub trait ServerBitmapSink: Send + Sync {
    async fn push_card(&self, record: &CardBitmapRecord) -> Result<(), BackendError>;

    async fn push_tag(&self, record: &TagBitmapRecord) -> Result<(), BackendError>;

    async fn remove_card(&self, tenant: &TenantKey, card_id: &str) -> Result<(), BackendError>;

    async fn remove_tag(&self, tenant: &TenantKey, tag_id: &str) -> Result<(), BackendError>;
}
