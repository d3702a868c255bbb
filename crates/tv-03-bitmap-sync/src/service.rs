//! Bitmap Sync Service
//!
//! Validates client payloads at the trust boundary and upserts the
//! resulting records into the injected `BitmapStore`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use shared_types::{CardBitmapRecord, TagBitmapRecord, TenantKey};
use tracing::{debug, info, warn};

use crate::domain::{
    card_checksum, claimed_tenant, tag_checksum, BitmapSnapshot, CardBitmapPayload, SyncReceipt,
    TagBitmapPayload,
};
use crate::error::SyncError;
use crate::ports::{BitmapStore, BitmapSyncApi};

/// Intake counters.
#[derive(Default)]
pub struct SyncStats {
    cards_accepted: AtomicU64,
    tags_accepted: AtomicU64,
    privacy_rejections: AtomicU64,
    validation_rejections: AtomicU64,
    deletions: AtomicU64,
}

/// Point-in-time copy of [`SyncStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStatsSnapshot {
    pub cards_accepted: u64,
    pub tags_accepted: u64,
    pub privacy_rejections: u64,
    pub validation_rejections: u64,
    pub deletions: u64,
}

impl SyncStats {
    fn snapshot(&self) -> SyncStatsSnapshot {
        SyncStatsSnapshot {
            cards_accepted: self.cards_accepted.load(Ordering::Relaxed),
            tags_accepted: self.tags_accepted.load(Ordering::Relaxed),
            privacy_rejections: self.privacy_rejections.load(Ordering::Relaxed),
            validation_rejections: self.validation_rejections.load(Ordering::Relaxed),
            deletions: self.deletions.load(Ordering::Relaxed),
        }
    }
}

pub struct BitmapSyncService<S: BitmapStore> {
    store: Arc<S>,
    stats: SyncStats,
}

impl<S: BitmapStore> BitmapSyncService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            stats: SyncStats::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store an already-validated card payload.
    pub fn store_card(&self, payload: CardBitmapPayload) -> Result<SyncReceipt, SyncError> {
        let checksum = card_checksum(payload.card_bitmap, &payload.tag_bitmaps);
        let record = CardBitmapRecord {
            card_id: payload.card_id,
            tenant_key: payload.tenant_key,
            card_bitmap: payload.card_bitmap,
            tag_bitmaps: payload.tag_bitmaps,
            checksum: checksum.clone(),
        };
        let (id, tenant_key) = (record.card_id.clone(), record.tenant_key.clone());
        let created = self.store.upsert_card(record)?;
        self.stats.cards_accepted.fetch_add(1, Ordering::Relaxed);
        debug!(
            user_id = %tenant_key.user_id,
            workspace_id = %tenant_key.workspace_id,
            card_id = %id,
            created,
            "Card bitmap stored"
        );
        Ok(SyncReceipt {
            id,
            tenant_key,
            checksum,
            created,
        })
    }

    /// Store an already-validated tag payload.
    pub fn store_tag(&self, payload: TagBitmapPayload) -> Result<SyncReceipt, SyncError> {
        let checksum = tag_checksum(payload.tag_bitmap, payload.card_count);
        let record = TagBitmapRecord {
            tag_id: payload.tag_id,
            tenant_key: payload.tenant_key,
            tag_bitmap: payload.tag_bitmap,
            checksum: checksum.clone(),
            card_count: payload.card_count,
        };
        let (id, tenant_key) = (record.tag_id.clone(), record.tenant_key.clone());
        let created = self.store.upsert_tag(record)?;
        self.stats.tags_accepted.fetch_add(1, Ordering::Relaxed);
        debug!(
            user_id = %tenant_key.user_id,
            workspace_id = %tenant_key.workspace_id,
            tag_id = %id,
            created,
            "Tag bitmap stored"
        );
        Ok(SyncReceipt {
            id,
            tenant_key,
            checksum,
            created,
        })
    }

    /// Count and log a rejected payload.
    fn rejected(&self, payload: &Value, error: SyncError) -> SyncError {
        let tenant = claimed_tenant(payload);
        let (user_id, workspace_id) = tenant
            .as_ref()
            .map(|t| (t.user_id.as_str(), t.workspace_id.as_str()))
            .unwrap_or(("unknown", "unknown"));
        match &error {
            SyncError::PrivacyViolation { fields } => {
                self.stats.privacy_rejections.fetch_add(1, Ordering::Relaxed);
                warn!(user_id, workspace_id, fields = ?fields, "Rejected payload carrying content fields");
            }
            _ => {
                self.stats
                    .validation_rejections
                    .fetch_add(1, Ordering::Relaxed);
                debug!(user_id, workspace_id, error = %error, "Rejected invalid bitmap payload");
            }
        }
        error
    }
}

impl<S: BitmapStore> BitmapSyncApi for BitmapSyncService<S> {
    fn sync_card_bitmap(&self, payload: &Value) -> Result<SyncReceipt, SyncError> {
        let typed = CardBitmapPayload::from_json(payload).map_err(|e| self.rejected(payload, e))?;
        self.store_card(typed)
    }

    fn sync_tag_bitmap(&self, payload: &Value) -> Result<SyncReceipt, SyncError> {
        let typed = TagBitmapPayload::from_json(payload).map_err(|e| self.rejected(payload, e))?;
        self.store_tag(typed)
    }

    fn query_bitmaps(&self, tenant: &TenantKey) -> Result<BitmapSnapshot, SyncError> {
        tenant.validate()?;
        Ok(BitmapSnapshot {
            tenant_key: tenant.clone(),
            cards: self.store.cards_for(tenant)?,
            tags: self.store.tags_for(tenant)?,
        })
    }

    fn delete_card_bitmap(&self, tenant: &TenantKey, card_id: &str) -> Result<bool, SyncError> {
        tenant.validate()?;
        let existed = self.store.remove_card(tenant, card_id)?;
        if existed {
            self.stats.deletions.fetch_add(1, Ordering::Relaxed);
            info!(
                user_id = %tenant.user_id,
                workspace_id = %tenant.workspace_id,
                card_id,
                "Card bitmap deleted"
            );
        }
        Ok(existed)
    }

    fn delete_tag_bitmap(&self, tenant: &TenantKey, tag_id: &str) -> Result<bool, SyncError> {
        tenant.validate()?;
        let existed = self.store.remove_tag(tenant, tag_id)?;
        if existed {
            self.stats.deletions.fetch_add(1, Ordering::Relaxed);
            info!(
                user_id = %tenant.user_id,
                workspace_id = %tenant.workspace_id,
                tag_id,
                "Tag bitmap deleted"
            );
        }
        Ok(existed)
    }

    fn stats(&self) -> SyncStatsSnapshot {
        self.stats.snapshot()
    }
}
