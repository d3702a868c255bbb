//! `CardBitmapSource` backed by the sync service's store.

use shared_types::{CardBitmapRecord, TenantKey};
use tracing::error;
use tv_02_bitmap_filter::{CardBitmapSource, FilterError};

use crate::ports::BitmapStore;
use crate::service::BitmapSyncService;

impl<S: BitmapStore> CardBitmapSource for BitmapSyncService<S> {
    fn card_records(&self, tenant: &TenantKey) -> Result<Vec<CardBitmapRecord>, FilterError> {
        self.store().cards_for(tenant).map_err(|e| {
            error!(
                user_id = %tenant.user_id,
                workspace_id = %tenant.workspace_id,
                error = %e,
                "Bitmap store read failed"
            );
            FilterError::SourceUnavailable(e.to_string())
        })
    }
}
