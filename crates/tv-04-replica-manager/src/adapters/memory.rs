//! In-memory replica backend.
//!
//! Counts creations and schema provisions, and can be switched offline or
//! slowed down so tests can exercise timeouts and the retry queue.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use shared_types::TenantKey;

use crate::domain::{EncryptedRow, RowKey, Table};
use crate::error::BackendError;
use crate::ports::{ReplicaBackend, RowWrite};

#[derive(Default)]
struct ReplicaState {
    tables: BTreeSet<Table>,
    rows: BTreeMap<RowKey, EncryptedRow>,
    cloud_pushes: u64,
}

#[derive(Default)]
pub struct InMemoryReplicaBackend {
    replicas: DashMap<String, Mutex<ReplicaState>>,
    creations: AtomicU64,
    schema_provisions: AtomicU64,
    offline: AtomicBool,
    create_delay: Mutex<Duration>,
}

impl InMemoryReplicaBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Physical replicas created so far.
    pub fn creations(&self) -> u64 {
        self.creations.load(Ordering::SeqCst)
    }

    /// Tables actually created (not already present).
    pub fn schema_provisions(&self) -> u64 {
        self.schema_provisions.load(Ordering::SeqCst)
    }

    /// While offline every call fails with `Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_create_delay(&self, delay: Duration) {
        *self.create_delay.lock() = delay;
    }

    pub fn row_count(&self, location: &str, table: Table) -> usize {
        self.replicas
            .get(location)
            .map(|r| r.lock().rows.keys().filter(|k| k.table == table).count())
            .unwrap_or(0)
    }

    /// Every stored row of a replica.
    pub fn rows(&self, location: &str) -> Vec<(RowKey, EncryptedRow)> {
        self.replicas
            .get(location)
            .map(|r| {
                r.lock()
                    .rows
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn cloud_pushes(&self, location: &str) -> u64 {
        self.replicas
            .get(location)
            .map(|r| r.lock().cloud_pushes)
            .unwrap_or(0)
    }

    fn check_online(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(BackendError::Unavailable("replica backend offline".into()))
        } else {
            Ok(())
        }
    }

    fn with_replica<T>(
        &self,
        location: &str,
        f: impl FnOnce(&mut ReplicaState) -> T,
    ) -> Result<T, BackendError> {
        self.check_online()?;
        let replica = self
            .replicas
            .get(location)
            .ok_or_else(|| BackendError::UnknownReplica(location.to_string()))?;
        let mut state = replica.lock();
        Ok(f(&mut state))
    }
}

#[async_trait]
impl ReplicaBackend for InMemoryReplicaBackend {
    async fn create_replica(&self, tenant: &TenantKey) -> Result<String, BackendError> {
        self.check_online()?;
        let delay = *self.create_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let location = format!("memory://{}/{}", tenant.user_id, tenant.workspace_id);
        self.replicas.entry(location.clone()).or_default();
        self.creations.fetch_add(1, Ordering::SeqCst);
        Ok(location)
    }

    async fn ensure_schema(&self, location: &str, tables: &[Table]) -> Result<(), BackendError> {
        let created = self.with_replica(location, |state| {
            tables.iter().filter(|t| state.tables.insert(**t)).count()
        })?;
        self.schema_provisions
            .fetch_add(created as u64, Ordering::SeqCst);
        Ok(())
    }

    async fn write_rows(&self, location: &str, writes: Vec<RowWrite>) -> Result<(), BackendError> {
        self.with_replica(location, |state| {
            for write in writes {
                match write {
                    RowWrite::Put { key, row } => {
                        state.rows.insert(key, row);
                    }
                    RowWrite::Delete { key } => {
                        state.rows.remove(&key);
                    }
                }
            }
        })
    }

    async fn read_row(&self, location: &str, key: &RowKey) -> Result<Option<EncryptedRow>, BackendError> {
        self.with_replica(location, |state| state.rows.get(key).cloned())
    }

    async fn push_to_cloud(&self, location: &str) -> Result<(), BackendError> {
        self.with_replica(location, |state| state.cloud_pushes += 1)
    }
}
