//! Wire conversion for routed queries.
//!
//! Failures become `QueryResult::failure` records carrying the error kind.

use std::sync::Arc;

use shared_types::{OperatingMode, QueryResult, TenantKey};
use tv_02_bitmap_filter::FilterRequest;

use crate::ports::QueryRouterApi;

pub struct QueryHandler<R: QueryRouterApi> {
    router: Arc<R>,
}

impl<R: QueryRouterApi> QueryHandler<R> {
    pub fn new(router: Arc<R>) -> Self {
        Self { router }
    }

    pub async fn content(&self, tenant: &TenantKey, mode: OperatingMode) -> QueryResult {
        self.router
            .route_content_query(tenant, mode)
            .await
            .unwrap_or_else(|e| QueryResult::failure(&e))
    }

    pub async fn bitmap(&self, tenant: &TenantKey, operations: &[FilterRequest]) -> QueryResult {
        self.router
            .route_bitmap_operation(tenant, operations)
            .await
            .unwrap_or_else(|e| QueryResult::failure(&e))
    }

    pub async fn filtered(
        &self,
        tenant: &TenantKey,
        mode: OperatingMode,
        operations: &[FilterRequest],
    ) -> QueryResult {
        match self.router.route_filtered_query(tenant, mode, operations).await {
            Ok(composite) => composite.into(),
            Err(e) => QueryResult::failure(&e),
        }
    }
}
