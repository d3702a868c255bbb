//! Inbound Ports (Driving Ports)

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{CardBitmapRecord, CardContent, TagBitmapRecord, TagContent, TenantKey};

use crate::domain::{BrowserSnapshot, ReplicaHandle, SyncSummary};
use crate::error::ReplicaError;

#[async_trait]
pub trait ReplicaManagerApi: Send + Sync {
    /// Memoised per tenant; concurrent first callers share one creation.
    async fn get_or_create_replica(&self, tenant: &TenantKey) -> Result<Arc<ReplicaHandle>, ReplicaError>;

    /// Mirror a browser snapshot into the tenant's replica and forward its
    /// bitmaps to the server tier. Connectivity failures are queued, not
    /// returned.
    async fn sync_browser_to_server(
        &self,
        tenant: &TenantKey,
        snapshot: BrowserSnapshot,
    ) -> Result<SyncSummary, ReplicaError>;

    fn obfuscate_card(&self, card: &CardContent) -> CardBitmapRecord;

    fn obfuscate_tag(&self, tag: &TagContent, card_count: u64) -> TagBitmapRecord;

    fn verify_card_checksum(&self, record: &CardBitmapRecord, card: &CardContent) -> bool;
}
