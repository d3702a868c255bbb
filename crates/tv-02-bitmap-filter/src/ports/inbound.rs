//! Inbound Ports (Driving Ports)

use shared_types::{CardBitmapRecord, FilterResult, TenantKey};

use crate::domain::FilterRequest;
use crate::error::FilterError;
use crate::metrics::FilterMetricsSnapshot;

/// Primary filter API (Driving Port)
pub trait BitmapFilterApi: Send + Sync {
    /// Filter `cards` for `tenant`.
    ///
    /// Records belonging to any other tenant are discarded before the
    /// request is evaluated, whatever their bitmaps.
    fn filter(
        &self,
        request: &FilterRequest,
        tenant: &TenantKey,
        cards: &[CardBitmapRecord],
    ) -> Result<FilterResult, FilterError>;

    fn metrics(&self) -> FilterMetricsSnapshot;
}
