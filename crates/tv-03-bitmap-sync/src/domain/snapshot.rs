//! Query and receipt shapes.

use serde::{Deserialize, Serialize};
use shared_types::{CardBitmapRecord, TagBitmapRecord, TenantKey};

/// Every bitmap record held for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitmapSnapshot {
    pub tenant_key: TenantKey,
    pub cards: Vec<CardBitmapRecord>,
    pub tags: Vec<TagBitmapRecord>,
}

impl BitmapSnapshot {
    pub fn empty(tenant_key: TenantKey) -> Self {
        Self {
            tenant_key,
            cards: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.tags.is_empty()
    }
}

/// Outcome of an accepted sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReceipt {
    /// Card or tag id.
    pub id: String,
    pub tenant_key: TenantKey,
    pub checksum: String,
    /// `false` when an existing record was overwritten.
    pub created: bool,
}
