//! Inbound Ports (Driving Ports)

use serde_json::Value;
use shared_types::TenantKey;

use crate::domain::{BitmapSnapshot, SyncReceipt};
use crate::error::SyncError;
use crate::service::SyncStatsSnapshot;

/// Bitmap sync API (Driving Port)
pub trait BitmapSyncApi: Send + Sync {
    /// Validate and store a card bitmap payload.
    fn sync_card_bitmap(&self, payload: &Value) -> Result<SyncReceipt, SyncError>;

    /// Validate and store a tag bitmap payload.
    fn sync_tag_bitmap(&self, payload: &Value) -> Result<SyncReceipt, SyncError>;

    /// Tenant-scoped read. Unknown tenants get an empty snapshot.
    fn query_bitmaps(&self, tenant: &TenantKey) -> Result<BitmapSnapshot, SyncError>;

    /// Tombstone a card. Returns whether it existed.
    fn delete_card_bitmap(&self, tenant: &TenantKey, card_id: &str) -> Result<bool, SyncError>;

    /// Tombstone a tag. Returns whether it existed.
    fn delete_tag_bitmap(&self, tenant: &TenantKey, tag_id: &str) -> Result<bool, SyncError>;

    fn stats(&self) -> SyncStatsSnapshot;
}
