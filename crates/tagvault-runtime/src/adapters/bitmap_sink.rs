//! # Server Bitmap Sink Adapter
//!
//! Connects the replica manager's outbound `ServerBitmapSink` port to the
//! bitmap sync service. Records travel as the same camelCase JSON payloads a
//! remote client would send, so they pass the full privacy check on intake.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{CardBitmapRecord, Categorized, ErrorKind, TagBitmapRecord, TenantKey};
use tagvault_telemetry::log_tenant_event;
use tv_03_bitmap_sync::{BitmapSyncApi, CardBitmapPayload, SyncError, TagBitmapPayload};
use tv_04_replica_manager::{BackendError, ServerBitmapSink};

pub struct BitmapSyncSink<A: BitmapSyncApi> {
    api: Arc<A>,
}

impl<A: BitmapSyncApi> BitmapSyncSink<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

/// Connectivity and timeouts stay retryable; anything else is a refusal.
fn to_backend_error(error: SyncError) -> BackendError {
    match error.kind() {
        ErrorKind::Connectivity => BackendError::Unavailable(error.to_string()),
        ErrorKind::Timeout => BackendError::Timeout,
        _ => BackendError::Rejected(error.to_string()),
    }
}

fn forward_failed(tenant: &TenantKey, error: SyncError) -> BackendError {
    let kind = error.kind();
    let mapped = to_backend_error(error);
    if matches!(mapped, BackendError::Rejected(_)) {
        log_tenant_event!(warn, tenant, "Server tier refused forwarded bitmaps", kind = %kind);
    }
    mapped
}

#[async_trait]
impl<A: BitmapSyncApi + 'static> ServerBitmapSink for BitmapSyncSink<A> {
    async fn push_card(&self, record: &CardBitmapRecord) -> Result<(), BackendError> {
        let payload = CardBitmapPayload::from(record).to_json();
        self.api
            .sync_card_bitmap(&payload)
            .map(|_| ())
            .map_err(|e| forward_failed(&record.tenant_key, e))
    }

    async fn push_tag(&self, record: &TagBitmapRecord) -> Result<(), BackendError> {
        let payload = TagBitmapPayload::from(record).to_json();
        self.api
            .sync_tag_bitmap(&payload)
            .map(|_| ())
            .map_err(|e| forward_failed(&record.tenant_key, e))
    }

    async fn remove_card(&self, tenant: &TenantKey, card_id: &str) -> Result<(), BackendError> {
        self.api
            .delete_card_bitmap(tenant, card_id)
            .map(|_| ())
            .map_err(|e| forward_failed(tenant, e))
    }

    async fn remove_tag(&self, tenant: &TenantKey, tag_id: &str) -> Result<(), BackendError> {
        self.api
            .delete_tag_bitmap(tenant, tag_id)
            .map(|_| ())
            .map_err(|e| forward_failed(tenant, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::ObfuscationKey;
    use shared_types::CardContent;
    use tv_03_bitmap_sync::{BitmapSyncService, InMemoryBitmapStore, StoreError};
    use tv_04_replica_manager::domain::obfuscation;

    fn service() -> Arc<BitmapSyncService<InMemoryBitmapStore>> {
        Arc::new(BitmapSyncService::new(Arc::new(InMemoryBitmapStore::new())))
    }

    fn record(tenant: &TenantKey) -> CardBitmapRecord {
        let key = ObfuscationKey::derive(b"sink-secret", &tenant.user_id, &tenant.workspace_id);
        let card = CardContent {
            card_id: "c1".into(),
            tenant_key: tenant.clone(),
            title: "private title".into(),
            description: String::new(),
            content: "private body".into(),
            tag_ids: vec!["t1".into(), "t2".into()],
        };
        obfuscation::obfuscate_card(&key, &card)
    }

    #[tokio::test]
    async fn test_card_reaches_the_store_and_is_removed() {
        let sync = service();
        let sink = BitmapSyncSink::new(Arc::clone(&sync));
        let tenant = TenantKey::new("u1", "w1");

        sink.push_card(&record(&tenant)).await.unwrap();
        let snapshot = sync.query_bitmaps(&tenant).unwrap();
        assert_eq!(snapshot.cards.len(), 1);
        assert_eq!(snapshot.cards[0].tag_bitmaps.len(), 2);

        sink.remove_card(&tenant, "c1").await.unwrap();
        assert!(sync.query_bitmaps(&tenant).unwrap().cards.is_empty());
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            to_backend_error(SyncError::Store(StoreError::Timeout)),
            BackendError::Timeout
        );
        assert!(matches!(
            to_backend_error(SyncError::Store(StoreError::Unavailable("down".into()))),
            BackendError::Unavailable(_)
        ));
        assert!(matches!(
            to_backend_error(SyncError::PrivacyViolation {
                fields: vec!["name".into()]
            }),
            BackendError::Rejected(_)
        ));
    }
}
