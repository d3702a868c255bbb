//! # Outbound Ports (Driven Ports)
//!
//! One shared schema for every tenant; records are keyed by (tenant, id).
//!
//! Production stores live outside this crate. Testing: `InMemoryBitmapStore`.

use shared_types::{CardBitmapRecord, TagBitmapRecord, TenantKey};

use crate::error::StoreError;

pub trait BitmapStore: Send + Sync {
    /// Insert or overwrite. Returns `true` if the record did not exist.
    fn upsert_card(&self, record: CardBitmapRecord) -> Result<bool, StoreError>;

    fn upsert_tag(&self, record: TagBitmapRecord) -> Result<bool, StoreError>;

    /// Remove a record. Returns whether one existed.
    fn remove_card(&self, tenant: &TenantKey, card_id: &str) -> Result<bool, StoreError>;

    fn remove_tag(&self, tenant: &TenantKey, tag_id: &str) -> Result<bool, StoreError>;

    /// Every card of `tenant`, ordered by id.
    fn cards_for(&self, tenant: &TenantKey) -> Result<Vec<CardBitmapRecord>, StoreError>;

    /// Every tag of `tenant`, ordered by id.
    fn tags_for(&self, tenant: &TenantKey) -> Result<Vec<TagBitmapRecord>, StoreError>;
}
