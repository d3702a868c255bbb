//! Outbound Ports (Driven Ports)

use shared_types::{CardBitmapRecord, TenantKey};

use crate::error::FilterError;

/// Supplies the server-held card bitmaps of one tenant.
///
/// Implementations may return foreign records; the engine discards them.
pub trait CardBitmapSource: Send + Sync {
    fn card_records(&self, tenant: &TenantKey) -> Result<Vec<CardBitmapRecord>, FilterError>;
}
