//! Replica schema.
//!
//! One shared schema; every row key carries the tenant.
//!
//! ```text
//! obfuscated_cards(tenant, cardBitmap PK, tagBitmaps, checksum, syncVersion)
//! obfuscated_tags(tenant, tagBitmap PK, checksum, cardCount, syncVersion)
//! sync_metadata(tenant, key PK, value, updatedAt)
//! ```

use std::fmt;

use shared_types::TenantKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    ObfuscatedCards,
    ObfuscatedTags,
    SyncMetadata,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::ObfuscatedCards, Table::ObfuscatedTags, Table::SyncMetadata];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObfuscatedCards => "obfuscated_cards",
            Self::ObfuscatedTags => "obfuscated_tags",
            Self::SyncMetadata => "sync_metadata",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const LAST_SYNC_AT: &str = "last_sync_at";
pub const SYNC_VERSION: &str = "sync_version";

/// Primary key of a replica row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub table: Table,
    pub tenant: TenantKey,
    /// Bitmap (decimal) for card/tag rows, metadata key otherwise.
    pub key: String,
}

impl RowKey {
    pub fn card(tenant: &TenantKey, card_bitmap: u64) -> Self {
        Self::new(Table::ObfuscatedCards, tenant, card_bitmap.to_string())
    }

    pub fn tag(tenant: &TenantKey, tag_bitmap: u64) -> Self {
        Self::new(Table::ObfuscatedTags, tenant, tag_bitmap.to_string())
    }

    pub fn metadata(tenant: &TenantKey, key: &str) -> Self {
        Self::new(Table::SyncMetadata, tenant, key.to_string())
    }

    fn new(table: Table, tenant: &TenantKey, key: String) -> Self {
        Self {
            table,
            tenant: tenant.clone(),
            key,
        }
    }

    /// Flat storage key: `tenant.user \x1f tenant.workspace \x1f key`.
    ///
    /// The table is not part of it; key-value backends keep one column
    /// family per table.
    pub fn storage_key(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            self.tenant.user_id.len() + self.tenant.workspace_id.len() + self.key.len() + 2,
        );
        out.extend_from_slice(self.tenant.user_id.as_bytes());
        out.push(0x1F);
        out.extend_from_slice(self.tenant.workspace_id.as_bytes());
        out.push(0x1F);
        out.extend_from_slice(self.key.as_bytes());
        out
    }
}
