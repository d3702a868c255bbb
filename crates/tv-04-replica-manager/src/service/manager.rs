//! Replica Manager
//!
//! Long-lived per-process state, all owned by one instance:
//!
//! - obfuscation-key cache (`DashMap<TenantKey, Arc<ObfuscationKey>>`)
//! - replica cache, one single-flight cell per tenant
//! - last recorded sync version per tenant
//! - the retry queue sender and its not-yet-started receiver

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use shared_crypto::ObfuscationKey;
use shared_types::{
    ensure_same_tenant, CardBitmapRecord, CardContent, Categorized, TagBitmapRecord, TagContent,
    TenantKey,
};
use tokio::sync::{mpsc, watch, OnceCell};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::obfuscation;
use crate::domain::{
    BrowserSnapshot, EncryptedRow, MetadataRow, ObfuscatedCardRow, ObfuscatedTagRow, ReplicaConfig,
    ReplicaHandle, RetryJob, RowKey, SyncSummary, Table, LAST_SYNC_AT, SYNC_VERSION,
};
use crate::error::ReplicaError;
use crate::metrics::{ReplicaMetrics, ReplicaMetricsSnapshot};
use crate::ports::{ReplicaBackend, ReplicaManagerApi, RowWrite, ServerBitmapSink};

type ReplicaSlot = Arc<OnceCell<Arc<ReplicaHandle>>>;

pub struct ReplicaManager {
    config: ReplicaConfig,
    server_secret: Zeroizing<Vec<u8>>,
    backend: Arc<dyn ReplicaBackend>,
    sink: Option<Arc<dyn ServerBitmapSink>>,
    keys: DashMap<TenantKey, Arc<ObfuscationKey>>,
    replicas: DashMap<TenantKey, ReplicaSlot>,
    sync_versions: DashMap<TenantKey, u64>,
    retry_tx: mpsc::UnboundedSender<RetryJob>,
    retry_rx: Mutex<Option<mpsc::UnboundedReceiver<RetryJob>>>,
    shutdown_tx: watch::Sender<bool>,
    metrics: ReplicaMetrics,
}

impl ReplicaManager {
    pub fn new(server_secret: &[u8], backend: Arc<dyn ReplicaBackend>, config: ReplicaConfig) -> Self {
        let (retry_tx, retry_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            config,
            server_secret: Zeroizing::new(server_secret.to_vec()),
            backend,
            sink: None,
            keys: DashMap::new(),
            replicas: DashMap::new(),
            sync_versions: DashMap::new(),
            retry_tx,
            retry_rx: Mutex::new(Some(retry_rx)),
            shutdown_tx,
            metrics: ReplicaMetrics::default(),
        }
    }

    /// Forward obfuscated bitmaps to the server tier on every sync.
    pub fn with_sink(mut self, sink: Arc<dyn ServerBitmapSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &ReplicaConfig {
        &self.config
    }

    pub fn metrics(&self) -> ReplicaMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Stop in-flight syncs at their next record boundary and stop the
    /// retry worker.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
        info!("Replica manager shutting down");
    }

    /// Same as `sync_browser_to_server`, stopping between records once
    /// `cancel` reads `true`.
    pub async fn sync_with_cancel(
        &self,
        tenant: &TenantKey,
        snapshot: BrowserSnapshot,
        cancel: watch::Receiver<bool>,
    ) -> Result<SyncSummary, ReplicaError> {
        tenant.validate()?;
        self.check_snapshot_tenant(tenant, &snapshot)?;

        match self.run_bounded(tenant, &snapshot, &cancel).await {
            Ok(summary) => {
                self.record_outcome(&summary);
                Ok(summary)
            }
            Err(e) if e.kind().is_retryable() => {
                warn!(
                    user_id = %tenant.user_id,
                    workspace_id = %tenant.workspace_id,
                    error = %e,
                    "Replica sync deferred to retry queue"
                );
                let job = RetryJob::new(tenant.clone(), snapshot, e.to_string());
                let id = job.id;
                self.enqueue(job);
                Ok(SyncSummary::queued(tenant.clone(), id))
            }
            Err(e) => {
                error!(
                    user_id = %tenant.user_id,
                    workspace_id = %tenant.workspace_id,
                    kind = %e.kind(),
                    error = %e,
                    "Replica sync failed"
                );
                Err(e)
            }
        }
    }

    /// Decrypt the replica row of a card.
    pub async fn read_card_row(
        &self,
        tenant: &TenantKey,
        card_id: &str,
    ) -> Result<Option<ObfuscatedCardRow>, ReplicaError> {
        let replica = self.get_or_create_replica(tenant).await?;
        let key = self.key_for(tenant);
        let row_key = RowKey::card(tenant, obfuscation::card_bitmap(&key, card_id));
        self.open_row(&replica, &key, &row_key).await
    }

    /// Decrypt a `sync_metadata` row.
    pub async fn read_metadata(&self, tenant: &TenantKey, name: &str) -> Result<Option<MetadataRow>, ReplicaError> {
        let replica = self.get_or_create_replica(tenant).await?;
        let key = self.key_for(tenant);
        self.open_row(&replica, &key, &RowKey::metadata(tenant, name)).await
    }

    /// Start the background retry worker. Returns `None` if already started.
    pub fn spawn_retry_worker(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut jobs = self.retry_rx.lock().take()?;
        let manager = Arc::clone(self);
        let mut shutdown = self.shutdown_tx.subscribe();

        Some(tokio::spawn(async move {
            info!("Replica retry worker started");
            loop {
                tokio::select! {
                    job = jobs.recv() => {
                        let Some(job) = job else { break };
                        let manager = Arc::clone(&manager);
                        tokio::spawn(async move { manager.process_retry(job).await });
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("Replica retry worker stopped");
        }))
    }

    fn key_for(&self, tenant: &TenantKey) -> Arc<ObfuscationKey> {
        self.keys
            .entry(tenant.clone())
            .or_insert_with(|| {
                Arc::new(ObfuscationKey::derive(
                    &self.server_secret,
                    &tenant.user_id,
                    &tenant.workspace_id,
                ))
            })
            .clone()
    }

    fn check_snapshot_tenant(&self, tenant: &TenantKey, snapshot: &BrowserSnapshot) -> Result<(), ReplicaError> {
        let owners = snapshot
            .cards
            .iter()
            .map(|c| &c.tenant_key)
            .chain(snapshot.tags.iter().map(|t| &t.tenant_key));
        for owner in owners {
            if let Err(mismatch) = ensure_same_tenant(tenant, owner) {
                error!(
                    user_id = %tenant.user_id,
                    workspace_id = %tenant.workspace_id,
                    "Snapshot carries records of another tenant; nothing written"
                );
                return Err(mismatch.into());
            }
        }
        Ok(())
    }

    async fn create_replica(&self, tenant: &TenantKey) -> Result<Arc<ReplicaHandle>, ReplicaError> {
        let location = self.backend.create_replica(tenant).await?;
        self.backend.ensure_schema(&location, &Table::ALL).await?;
        ReplicaMetrics::incr(&self.metrics.replicas_created);

        let handle = ReplicaHandle {
            id: Uuid::new_v4(),
            tenant: tenant.clone(),
            location,
            created_at: SystemTime::now(),
        };
        info!(
            user_id = %tenant.user_id,
            workspace_id = %tenant.workspace_id,
            replica_id = %handle.id,
            "Replica created"
        );
        Ok(Arc::new(handle))
    }

    async fn open_row<T: serde::de::DeserializeOwned>(
        &self,
        replica: &ReplicaHandle,
        key: &ObfuscationKey,
        row_key: &RowKey,
    ) -> Result<Option<T>, ReplicaError> {
        match self.backend.read_row(&replica.location, row_key).await? {
            Some(row) => Ok(Some(row.open(key)?)),
            None => Ok(None),
        }
    }

    async fn next_sync_version(&self, replica: &ReplicaHandle, key: &ObfuscationKey) -> Result<u64, ReplicaError> {
        let cached = self.sync_versions.get(&replica.tenant).map(|v| *v);
        if let Some(version) = cached {
            return Ok(version + 1);
        }
        let stored: Option<MetadataRow> = self
            .open_row(replica, key, &RowKey::metadata(&replica.tenant, SYNC_VERSION))
            .await?;
        let last = stored
            .and_then(|row| row.value.parse::<u64>().ok())
            .unwrap_or(0);
        Ok(last + 1)
    }

    async fn run_bounded(
        &self,
        tenant: &TenantKey,
        snapshot: &BrowserSnapshot,
        cancel: &watch::Receiver<bool>,
    ) -> Result<SyncSummary, ReplicaError> {
        let limit = self.config.sync_timeout;
        tokio::time::timeout(limit, self.run_sync(tenant, snapshot, cancel))
            .await
            .map_err(|_| ReplicaError::Timeout {
                operation: "replica sync",
                after_ms: limit.as_millis() as u64,
            })?
    }

    async fn run_sync(
        &self,
        tenant: &TenantKey,
        snapshot: &BrowserSnapshot,
        cancel: &watch::Receiver<bool>,
    ) -> Result<SyncSummary, ReplicaError> {
        let replica = self.get_or_create_replica(tenant).await?;
        let key = self.key_for(tenant);
        let version = self.next_sync_version(&replica, &key).await?;
        let card_counts = snapshot.card_counts();
        let mut summary = SyncSummary::new(tenant.clone());

        // Each record is obfuscated and written as one batch; cancellation
        // is only observed between records.
        let mut cards = Vec::with_capacity(snapshot.cards.len());
        for card in &snapshot.cards {
            if is_cancelled(cancel) {
                return Ok(cancelled(summary));
            }
            let record = obfuscation::obfuscate_card(&key, card);
            let row = EncryptedRow::seal(
                &key,
                &ObfuscatedCardRow {
                    card_bitmap: record.card_bitmap,
                    tag_bitmaps: record.tag_bitmaps.iter().copied().collect(),
                    checksum: record.checksum.clone(),
                    sync_version: version,
                },
            )?;
            self.backend
                .write_rows(
                    &replica.location,
                    vec![RowWrite::put(RowKey::card(tenant, record.card_bitmap), row)],
                )
                .await?;
            ReplicaMetrics::incr(&self.metrics.records_obfuscated);
            summary.cards_written += 1;
            cards.push(record);
        }

        let mut tags = Vec::with_capacity(snapshot.tags.len());
        for tag in &snapshot.tags {
            if is_cancelled(cancel) {
                return Ok(cancelled(summary));
            }
            let card_count = card_counts.get(tag.tag_id.as_str()).copied().unwrap_or(0);
            let record = obfuscation::obfuscate_tag(&key, tag, card_count);
            let row = EncryptedRow::seal(
                &key,
                &ObfuscatedTagRow {
                    tag_bitmap: record.tag_bitmap,
                    checksum: record.checksum.clone(),
                    card_count,
                    sync_version: version,
                },
            )?;
            self.backend
                .write_rows(
                    &replica.location,
                    vec![RowWrite::put(RowKey::tag(tenant, record.tag_bitmap), row)],
                )
                .await?;
            ReplicaMetrics::incr(&self.metrics.records_obfuscated);
            summary.tags_written += 1;
            tags.push(record);
        }

        for card_id in &snapshot.deleted_card_ids {
            if is_cancelled(cancel) {
                return Ok(cancelled(summary));
            }
            let row_key = RowKey::card(tenant, obfuscation::card_bitmap(&key, card_id));
            self.backend
                .write_rows(&replica.location, vec![RowWrite::delete(row_key)])
                .await?;
            summary.cards_deleted += 1;
        }
        for tag_id in &snapshot.deleted_tag_ids {
            if is_cancelled(cancel) {
                return Ok(cancelled(summary));
            }
            let row_key = RowKey::tag(tenant, obfuscation::tag_bitmap(&key, tag_id));
            self.backend
                .write_rows(&replica.location, vec![RowWrite::delete(row_key)])
                .await?;
            summary.tags_deleted += 1;
        }

        if let Some(sink) = &self.sink {
            if is_cancelled(cancel) {
                return Ok(cancelled(summary));
            }
            for record in &cards {
                sink.push_card(record).await?;
            }
            for record in &tags {
                sink.push_tag(record).await?;
            }
            for card_id in &snapshot.deleted_card_ids {
                sink.remove_card(tenant, card_id).await?;
            }
            for tag_id in &snapshot.deleted_tag_ids {
                sink.remove_tag(tenant, tag_id).await?;
            }
            summary.forwarded = true;
        }

        let now = unix_millis();
        let metadata = |value: String| MetadataRow {
            value,
            updated_at: now,
        };
        self.backend
            .write_rows(
                &replica.location,
                vec![
                    RowWrite::put(
                        RowKey::metadata(tenant, LAST_SYNC_AT),
                        EncryptedRow::seal(&key, &metadata(now.to_string()))?,
                    ),
                    RowWrite::put(
                        RowKey::metadata(tenant, SYNC_VERSION),
                        EncryptedRow::seal(&key, &metadata(version.to_string()))?,
                    ),
                ],
            )
            .await?;
        self.backend.push_to_cloud(&replica.location).await?;
        self.sync_versions.insert(tenant.clone(), version);

        summary.sync_version = version;
        debug!(
            user_id = %tenant.user_id,
            workspace_id = %tenant.workspace_id,
            cards = summary.cards_written,
            tags = summary.tags_written,
            sync_version = version,
            "Replica sync complete"
        );
        Ok(summary)
    }

    fn record_outcome(&self, summary: &SyncSummary) {
        if summary.cancelled {
            ReplicaMetrics::incr(&self.metrics.syncs_cancelled);
            info!(
                user_id = %summary.tenant.user_id,
                workspace_id = %summary.tenant.workspace_id,
                cards_written = summary.cards_written,
                "Replica sync cancelled"
            );
        } else {
            ReplicaMetrics::incr(&self.metrics.syncs_completed);
        }
    }

    fn enqueue(&self, job: RetryJob) {
        ReplicaMetrics::incr(&self.metrics.retries_queued);
        ReplicaMetrics::incr(&self.metrics.retry_queue_depth);
        if let Err(mpsc::error::SendError(job)) = self.retry_tx.send(job) {
            self.drop_job(&job, "retry queue closed");
        }
    }

    fn drop_job(&self, job: &RetryJob, reason: &str) {
        self.metrics.job_finished();
        ReplicaMetrics::incr(&self.metrics.retries_dropped);
        error!(
            job_id = %job.id,
            user_id = %job.tenant.user_id,
            workspace_id = %job.tenant.workspace_id,
            attempts = job.attempts,
            last_error = %job.last_error,
            reason,
            "Dropping replica sync job"
        );
    }

    async fn process_retry(self: Arc<Self>, mut job: RetryJob) {
        let delay = self.config.retry.delay_for(job.attempts);
        let mut shutdown = self.shutdown_tx.subscribe();
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => {
                self.drop_job(&job, "shutdown");
                return;
            }
        }

        job.attempts += 1;
        let cancel = self.shutdown_tx.subscribe();
        match self.run_bounded(&job.tenant, &job.snapshot, &cancel).await {
            Ok(summary) if summary.cancelled => self.drop_job(&job, "shutdown"),
            Ok(summary) => {
                self.metrics.job_finished();
                ReplicaMetrics::incr(&self.metrics.retries_succeeded);
                self.record_outcome(&summary);
                info!(
                    job_id = %job.id,
                    user_id = %job.tenant.user_id,
                    workspace_id = %job.tenant.workspace_id,
                    attempts = job.attempts,
                    "Deferred replica sync succeeded"
                );
            }
            Err(e) if e.kind().is_retryable() && !self.config.retry.is_exhausted(job.attempts) => {
                job.last_error = e.to_string();
                debug!(
                    job_id = %job.id,
                    attempts = job.attempts,
                    error = %e,
                    "Deferred replica sync failed, requeueing"
                );
                if let Err(mpsc::error::SendError(job)) = self.retry_tx.send(job) {
                    self.drop_job(&job, "retry queue closed");
                }
            }
            Err(e) => {
                job.last_error = e.to_string();
                let reason = if e.kind().is_retryable() {
                    "attempts exhausted"
                } else {
                    "non-retryable error"
                };
                self.drop_job(&job, reason);
            }
        }
    }
}

fn is_cancelled(cancel: &watch::Receiver<bool>) -> bool {
    *cancel.borrow()
}

fn cancelled(mut summary: SyncSummary) -> SyncSummary {
    summary.cancelled = true;
    summary
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[async_trait]
impl ReplicaManagerApi for ReplicaManager {
    async fn get_or_create_replica(&self, tenant: &TenantKey) -> Result<Arc<ReplicaHandle>, ReplicaError> {
        tenant.validate()?;
        let slot: ReplicaSlot = self.replicas.entry(tenant.clone()).or_default().clone();
        let limit = self.config.creation_timeout;

        match tokio::time::timeout(limit, slot.get_or_try_init(|| self.create_replica(tenant))).await {
            Ok(result) => result.cloned(),
            Err(_) => {
                warn!(
                    user_id = %tenant.user_id,
                    workspace_id = %tenant.workspace_id,
                    timeout_ms = limit.as_millis() as u64,
                    "Replica creation timed out"
                );
                Err(ReplicaError::Timeout {
                    operation: "replica creation",
                    after_ms: limit.as_millis() as u64,
                })
            }
        }
    }

    async fn sync_browser_to_server(
        &self,
        tenant: &TenantKey,
        snapshot: BrowserSnapshot,
    ) -> Result<SyncSummary, ReplicaError> {
        let cancel = self.shutdown_tx.subscribe();
        self.sync_with_cancel(tenant, snapshot, cancel).await
    }

    fn obfuscate_card(&self, card: &CardContent) -> CardBitmapRecord {
        obfuscation::obfuscate_card(&self.key_for(&card.tenant_key), card)
    }

    fn obfuscate_tag(&self, tag: &TagContent, card_count: u64) -> TagBitmapRecord {
        obfuscation::obfuscate_tag(&self.key_for(&tag.tenant_key), tag, card_count)
    }

    fn verify_card_checksum(&self, record: &CardBitmapRecord, card: &CardContent) -> bool {
        obfuscation::verify_card_checksum(&self.key_for(&record.tenant_key), record, card)
    }
}
