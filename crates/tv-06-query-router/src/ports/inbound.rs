//! Inbound Ports (Driving Ports)

use async_trait::async_trait;
use shared_types::{OperatingMode, QueryResult, TenantKey};
use tv_02_bitmap_filter::FilterRequest;

use crate::domain::CompositeResult;
use crate::error::QueryError;
use crate::metrics::QueryMetricsSnapshot;

#[async_trait]
pub trait QueryRouterApi: Send + Sync {
    /// Read every card of `tenant` from the tier `mode` selects.
    async fn route_content_query(
        &self,
        tenant: &TenantKey,
        mode: OperatingMode,
    ) -> Result<QueryResult, QueryError>;

    /// Evaluate bitmap operations on the server tier, whatever the mode.
    /// Identifiers only; several operations are intersected.
    async fn route_bitmap_operation(
        &self,
        tenant: &TenantKey,
        operations: &[FilterRequest],
    ) -> Result<QueryResult, QueryError>;

    /// Filter, then resolve content. Two phases in privacy mode, one
    /// round trip otherwise.
    async fn route_filtered_query(
        &self,
        tenant: &TenantKey,
        mode: OperatingMode,
        operations: &[FilterRequest],
    ) -> Result<CompositeResult, QueryError>;

    fn metrics(&self) -> QueryMetricsSnapshot;
}
