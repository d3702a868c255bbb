//! # RocksDB Replica Backend
//!
//! Production `ReplicaBackend`: one database holds the replicas of every
//! tenant.
//!
//! ## Column Families
//!
//! - `obfuscated_cards` - encrypted card rows
//! - `obfuscated_tags` - encrypted tag rows
//! - `sync_metadata` - encrypted sync bookkeeping
//! - `replicas` - provisioned replica locations
//!
//! Row keys are `user_id 0x1F workspace_id 0x1F key`, so one tenant's rows
//! form a contiguous prefix. Values are `nonce || ciphertext`; the backend
//! never sees plaintext.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Options, WriteBatch, WriteOptions, DB};
use shared_types::TenantKey;
use tracing::{debug, info};
use tv_04_replica_manager::{BackendError, EncryptedRow, ReplicaBackend, RowKey, RowWrite, Table};

/// Registry of provisioned replicas.
pub const CF_REPLICAS: &str = "replicas";

/// RocksDB configuration for the replica store
#[derive(Debug, Clone)]
pub struct RocksDbReplicaConfig {
    pub path: PathBuf,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl RocksDbReplicaConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_buffer_size: 16 * 1024 * 1024, // 16MB
            sync_writes: true,
        }
    }

    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_buffer_size: 1024 * 1024, // 1MB
            sync_writes: false,
        }
    }
}

pub struct RocksDbReplicaBackend {
    store: Arc<ReplicaStore>,
}

/// The database and its settings. Every method blocks on disk I/O and runs
/// on the blocking pool.
struct ReplicaStore {
    db: DB,
    config: RocksDbReplicaConfig,
}

fn io_error(operation: &str, e: rocksdb::Error) -> BackendError {
    BackendError::Unavailable(format!("RocksDB {operation} failed: {e}"))
}

/// Replica location of a tenant.
fn location_of(tenant: &TenantKey) -> String {
    tenant.to_string()
}

impl RocksDbReplicaBackend {
    /// Open or create the replica database.
    pub fn open(config: RocksDbReplicaConfig) -> Result<Self, BackendError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = Table::ALL
            .iter()
            .map(Table::as_str)
            .chain(std::iter::once(CF_REPLICAS))
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| io_error("open", e))?;
        info!(path = %config.path.display(), "Opened RocksDB replica store");

        Ok(Self {
            store: Arc::new(ReplicaStore { db, config }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.store.config.path
    }

    /// Run `call` on the blocking pool; runtime workers never wait on disk.
    async fn blocking<T, F>(&self, operation: &'static str, call: F) -> Result<T, BackendError>
    where
        F: FnOnce(&ReplicaStore) -> Result<T, BackendError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || call(&store))
            .await
            .map_err(|e| BackendError::Unavailable(format!("RocksDB {operation} task failed: {e}")))?
    }
}

impl ReplicaStore {
    fn cf(&self, name: &str) -> Result<&ColumnFamily, BackendError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| BackendError::Unavailable(format!("missing column family {name}")))
    }

    fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }

    fn ensure_known(&self, location: &str) -> Result<(), BackendError> {
        let known = self
            .db
            .get_pinned_cf(self.cf(CF_REPLICAS)?, location.as_bytes())
            .map_err(|e| io_error("get", e))?
            .is_some();
        if known {
            Ok(())
        } else {
            Err(BackendError::UnknownReplica(location.to_string()))
        }
    }

    /// A row key must belong to the replica it is written to or read from.
    fn check_owner(location: &str, key: &RowKey) -> Result<(), BackendError> {
        if location_of(&key.tenant) == location {
            Ok(())
        } else {
            Err(BackendError::Rejected(format!(
                "row key of another tenant in replica {location}"
            )))
        }
    }

    fn register(&self, location: &str) -> Result<(), BackendError> {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.db
            .put_cf_opt(
                self.cf(CF_REPLICAS)?,
                location.as_bytes(),
                created_at.to_be_bytes(),
                &self.write_options(),
            )
            .map_err(|e| io_error("put", e))
    }

    fn write(&self, location: &str, writes: &[RowWrite]) -> Result<(), BackendError> {
        self.ensure_known(location)?;
        let mut batch = WriteBatch::default();

        for write in writes {
            match write {
                RowWrite::Put { key, row } => {
                    Self::check_owner(location, key)?;
                    batch.put_cf(self.cf(key.table.as_str())?, key.storage_key(), row.to_bytes());
                }
                RowWrite::Delete { key } => {
                    Self::check_owner(location, key)?;
                    batch.delete_cf(self.cf(key.table.as_str())?, key.storage_key());
                }
            }
        }

        self.db
            .write_opt(batch, &self.write_options())
            .map_err(|e| io_error("batch write", e))
    }

    fn read(&self, location: &str, key: &RowKey) -> Result<Option<EncryptedRow>, BackendError> {
        self.ensure_known(location)?;
        Self::check_owner(location, key)?;
        let value = self
            .db
            .get_cf(self.cf(key.table.as_str())?, key.storage_key())
            .map_err(|e| io_error("get", e))?;
        value
            .map(|bytes| EncryptedRow::from_bytes(&bytes).map_err(|e| BackendError::Rejected(e.to_string())))
            .transpose()
    }
}

#[async_trait]
impl ReplicaBackend for RocksDbReplicaBackend {
    async fn create_replica(&self, tenant: &TenantKey) -> Result<String, BackendError> {
        let location = location_of(tenant);
        let registered = location.clone();
        self.blocking("put", move |store| store.register(&registered))
            .await?;
        debug!(location = %location, "Replica registered");
        Ok(location)
    }

    async fn ensure_schema(&self, location: &str, tables: &[Table]) -> Result<(), BackendError> {
        let location = location.to_string();
        let tables = tables.to_vec();
        self.blocking("schema check", move |store| {
            store.ensure_known(&location)?;
            // Column families are created when the database opens.
            for table in &tables {
                store.cf(table.as_str())?;
            }
            Ok(())
        })
        .await
    }

    async fn write_rows(&self, location: &str, writes: Vec<RowWrite>) -> Result<(), BackendError> {
        let location = location.to_string();
        self.blocking("batch write", move |store| store.write(&location, &writes))
            .await
    }

    async fn read_row(&self, location: &str, key: &RowKey) -> Result<Option<EncryptedRow>, BackendError> {
        let location = location.to_string();
        let key = key.clone();
        self.blocking("get", move |store| store.read(&location, &key))
            .await
    }

    async fn push_to_cloud(&self, location: &str) -> Result<(), BackendError> {
        let location = location.to_string();
        self.blocking("WAL flush", move |store| {
            store.ensure_known(&location)?;
            // Cloud replication tails the WAL; make everything written so far durable.
            store.db.flush_wal(true).map_err(|e| io_error("WAL flush", e))
        })
        .await
    }
}
