//! In-memory bitmap store.
//!
//! One map per table keyed by (tenant, id), mirroring the shared-schema
//! layout with a tenant column.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use shared_types::{CardBitmapRecord, TagBitmapRecord, TenantKey};

use crate::error::StoreError;
use crate::ports::BitmapStore;

type RowKey = (TenantKey, String);

#[derive(Default)]
pub struct InMemoryBitmapStore {
    cards: RwLock<BTreeMap<RowKey, CardBitmapRecord>>,
    tags: RwLock<BTreeMap<RowKey, TagBitmapRecord>>,
}

impl InMemoryBitmapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total card rows across all tenants.
    pub fn card_count(&self) -> usize {
        self.cards.read().len()
    }

    /// Total tag rows across all tenants.
    pub fn tag_count(&self) -> usize {
        self.tags.read().len()
    }
}

fn rows_for<T: Clone>(map: &BTreeMap<RowKey, T>, tenant: &TenantKey) -> Vec<T> {
    map.iter()
        .filter(|((t, _), _)| t == tenant)
        .map(|(_, v)| v.clone())
        .collect()
}

impl BitmapStore for InMemoryBitmapStore {
    fn upsert_card(&self, record: CardBitmapRecord) -> Result<bool, StoreError> {
        let key = (record.tenant_key.clone(), record.card_id.clone());
        Ok(self.cards.write().insert(key, record).is_none())
    }

    fn upsert_tag(&self, record: TagBitmapRecord) -> Result<bool, StoreError> {
        let key = (record.tenant_key.clone(), record.tag_id.clone());
        Ok(self.tags.write().insert(key, record).is_none())
    }

    fn remove_card(&self, tenant: &TenantKey, card_id: &str) -> Result<bool, StoreError> {
        let key = (tenant.clone(), card_id.to_string());
        Ok(self.cards.write().remove(&key).is_some())
    }

    fn remove_tag(&self, tenant: &TenantKey, tag_id: &str) -> Result<bool, StoreError> {
        let key = (tenant.clone(), tag_id.to_string());
        Ok(self.tags.write().remove(&key).is_some())
    }

    fn cards_for(&self, tenant: &TenantKey) -> Result<Vec<CardBitmapRecord>, StoreError> {
        Ok(rows_for(&self.cards.read(), tenant))
    }

    fn tags_for(&self, tenant: &TenantKey) -> Result<Vec<TagBitmapRecord>, StoreError> {
        Ok(rows_for(&self.tags.read(), tenant))
    }
}
