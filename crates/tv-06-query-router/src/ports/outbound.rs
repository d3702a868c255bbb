//! Outbound Ports (Driven Ports)

use async_trait::async_trait;
use shared_types::{CardContent, ConnectionType, TenantKey};
use tv_02_bitmap_filter::FilterRequest;

use crate::error::TierError;

/// A store holding card content: the browser store, the server store or the
/// local development store.
#[async_trait]
pub trait ContentTier: Send + Sync {
    fn connection_type(&self) -> ConnectionType;

    /// Cards of `tenant` with the given ids, in id order. Unknown ids are
    /// skipped.
    async fn resolve_content_by_ids(
        &self,
        tenant: &TenantKey,
        ids: &[String],
    ) -> Result<Vec<CardContent>, TierError>;

    /// Every card of `tenant` held by this tier.
    async fn read_local_content(&self, tenant: &TenantKey) -> Result<Vec<CardContent>, TierError>;

    /// Evaluate the conjunction of `operations` and resolve the matches in
    /// one call. Server and local tiers only.
    async fn filter_content(
        &self,
        tenant: &TenantKey,
        operations: &[FilterRequest],
    ) -> Result<Vec<CardContent>, TierError>;
}
