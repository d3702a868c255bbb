//! Query Router
//!
//! Façade over the connection router, the bitmap filter engine, set algebra
//! and the content tiers. Every call opens a connection handle for the tier
//! it talks to and closes it before returning, on every path.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{
    ensure_same_tenant, CardContent, Categorized, ConnectionType, OperatingMode, QueryResult,
    TenantKey,
};
use tracing::{debug, error, warn};
use tv_01_set_algebra::{SetAlgebraApi, TagSet};
use tv_02_bitmap_filter::{BitmapFilterApi, CardBitmapSource, FilterRequest};
use tv_05_connection_router::{ConnectionHandle, ConnectionParams, ConnectionRouterApi};

use crate::domain::{CompositeResult, QueryRouterConfig};
use crate::error::{QueryError, TierError};
use crate::metrics::{QueryMetrics, QueryMetricsSnapshot};
use crate::ports::{ContentTier, QueryRouterApi};

/// Closes the wrapped handle when dropped.
struct OpenConnection(ConnectionHandle);

impl OpenConnection {
    fn connection_type(&self) -> ConnectionType {
        self.0.connection_type()
    }
}

impl Drop for OpenConnection {
    fn drop(&mut self) {
        self.0.close();
    }
}

pub struct QueryRouter {
    config: QueryRouterConfig,
    connections: Arc<dyn ConnectionRouterApi>,
    filter: Arc<dyn BitmapFilterApi>,
    bitmap_source: Arc<dyn CardBitmapSource>,
    algebra: Arc<dyn SetAlgebraApi>,
    tiers: HashMap<ConnectionType, Arc<dyn ContentTier>>,
    metrics: QueryMetrics,
}

impl QueryRouter {
    pub fn new(
        connections: Arc<dyn ConnectionRouterApi>,
        filter: Arc<dyn BitmapFilterApi>,
        bitmap_source: Arc<dyn CardBitmapSource>,
        algebra: Arc<dyn SetAlgebraApi>,
    ) -> Self {
        Self {
            config: QueryRouterConfig::default(),
            connections,
            filter,
            bitmap_source,
            algebra,
            tiers: HashMap::new(),
            metrics: QueryMetrics::default(),
        }
    }

    pub fn with_config(mut self, config: QueryRouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a content tier under its connection type, replacing any
    /// earlier one.
    pub fn with_tier(mut self, tier: Arc<dyn ContentTier>) -> Self {
        self.tiers.insert(tier.connection_type(), tier);
        self
    }

    fn open(&self, tenant: &TenantKey, mode: OperatingMode) -> Result<OpenConnection, QueryError> {
        let params = ConnectionParams::from([
            ("user_id".to_string(), tenant.user_id.clone()),
            ("workspace_id".to_string(), tenant.workspace_id.clone()),
        ]);
        Ok(OpenConnection(self.connections.resolve_connection(mode, params)?))
    }

    fn tier(&self, connection_type: ConnectionType) -> Result<Arc<dyn ContentTier>, QueryError> {
        self.tiers
            .get(&connection_type)
            .cloned()
            .ok_or(QueryError::TierNotConfigured(connection_type))
    }

    async fn bounded<T, F>(&self, tier: ConnectionType, call: F) -> Result<T, QueryError>
    where
        F: Future<Output = Result<T, TierError>> + Send,
        T: Send,
    {
        let limit = self.config.timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result.map_err(|e| QueryError::Tier(tier, e)),
            Err(_) => {
                QueryMetrics::incr(&self.metrics.timeouts);
                Err(QueryError::Timeout {
                    tier,
                    after_ms: limit.as_millis() as u64,
                })
            }
        }
    }

    fn check_records(
        &self,
        tenant: &TenantKey,
        tier: ConnectionType,
        records: &[CardContent],
    ) -> Result<(), QueryError> {
        for record in records {
            if let Err(mismatch) = ensure_same_tenant(tenant, &record.tenant_key) {
                QueryMetrics::incr(&self.metrics.isolation_violations);
                error!(
                    user_id = %tenant.user_id,
                    workspace_id = %tenant.workspace_id,
                    tier = %tier,
                    "Content tier returned a record of another tenant"
                );
                return Err(mismatch.into());
            }
        }
        Ok(())
    }

    /// Drop resolved records the bitmap phase did not match.
    fn keep_matched(&self, tenant: &TenantKey, matched: &[String], records: Vec<CardContent>) -> Vec<CardContent> {
        let total = records.len();
        let kept: Vec<CardContent> = records
            .into_iter()
            .filter(|r| matched.contains(&r.card_id))
            .collect();
        let dropped = total - kept.len();
        if dropped > 0 {
            QueryMetrics::add(&self.metrics.unmatched_records_dropped, dropped);
            warn!(
                user_id = %tenant.user_id,
                workspace_id = %tenant.workspace_id,
                dropped,
                "Browser tier resolved cards outside the bitmap matches"
            );
        }
        kept
    }

    /// Bitmap phase on the server tier: matches of every operation,
    /// intersected.
    fn bitmap_matches(&self, tenant: &TenantKey, operations: &[FilterRequest]) -> Result<TagSet, QueryError> {
        if operations.is_empty() {
            return Err(QueryError::NoOperations);
        }
        let _server = self.open(tenant, OperatingMode::Normal)?;
        let records = self.bitmap_source.card_records(tenant)?;

        let sets = operations
            .iter()
            .map(|op| {
                self.filter
                    .filter(op, tenant, &records)
                    .map(|result| TagSet::from_iter(result.matched_card_ids))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.algebra.intersect(Some(tenant), &sets))
    }

    async fn content(&self, tenant: &TenantKey, mode: OperatingMode) -> Result<QueryResult, QueryError> {
        tenant.validate()?;
        let conn = self.open(tenant, mode)?;
        let tier_type = conn.connection_type();
        let tier = self.tier(tier_type)?;

        let records = self
            .bounded(tier_type, tier.read_local_content(tenant))
            .await?;
        self.check_records(tenant, tier_type, &records)?;
        Ok(QueryResult::with_records(tier_type, records))
    }

    async fn filtered(
        &self,
        tenant: &TenantKey,
        mode: OperatingMode,
        operations: &[FilterRequest],
    ) -> Result<CompositeResult, QueryError> {
        tenant.validate()?;

        if mode == OperatingMode::Privacy {
            // Server sees bitmaps only; the browser resolves the ids.
            let matched = self.bitmap_matches(tenant, operations)?.to_vec();
            let conn = self.open(tenant, mode)?;
            let tier_type = conn.connection_type();
            let tier = self.tier(tier_type)?;
            let records = self
                .bounded(tier_type, tier.resolve_content_by_ids(tenant, &matched))
                .await?;
            self.check_records(tenant, tier_type, &records)?;
            let records = self.keep_matched(tenant, &matched, records);
            return Ok(CompositeResult {
                mode,
                content_tier: tier_type,
                matched_card_ids: matched,
                records,
                round_trips: 2,
            });
        }

        if operations.is_empty() {
            return Err(QueryError::NoOperations);
        }
        let conn = self.open(tenant, mode)?;
        let tier_type = conn.connection_type();
        let tier = self.tier(tier_type)?;
        let records = self
            .bounded(tier_type, tier.filter_content(tenant, operations))
            .await?;
        self.check_records(tenant, tier_type, &records)?;
        Ok(CompositeResult {
            mode,
            content_tier: tier_type,
            matched_card_ids: records.iter().map(|r| r.card_id.clone()).collect(),
            records,
            round_trips: 1,
        })
    }

    fn finish<T>(&self, tenant: &TenantKey, query: &'static str, result: Result<T, QueryError>) -> Result<T, QueryError> {
        if let Err(e) = &result {
            QueryMetrics::incr(&self.metrics.failed_queries);
            if e.kind().is_fatal() {
                error!(
                    user_id = %tenant.user_id,
                    workspace_id = %tenant.workspace_id,
                    query,
                    kind = %e.kind(),
                    "Query aborted"
                );
            } else {
                warn!(
                    user_id = %tenant.user_id,
                    workspace_id = %tenant.workspace_id,
                    query,
                    error = %e,
                    "Query failed"
                );
            }
        }
        result
    }
}

#[async_trait]
impl QueryRouterApi for QueryRouter {
    async fn route_content_query(
        &self,
        tenant: &TenantKey,
        mode: OperatingMode,
    ) -> Result<QueryResult, QueryError> {
        QueryMetrics::incr(&self.metrics.content_queries);
        let result = self.content(tenant, mode).await;
        if let Ok(r) = &result {
            debug!(user_id = %tenant.user_id, mode = %mode, records = r.records.len(), "Content query served");
        }
        self.finish(tenant, "content", result)
    }

    async fn route_bitmap_operation(
        &self,
        tenant: &TenantKey,
        operations: &[FilterRequest],
    ) -> Result<QueryResult, QueryError> {
        QueryMetrics::incr(&self.metrics.bitmap_queries);
        let result = tenant
            .validate()
            .map_err(QueryError::from)
            .and_then(|()| self.bitmap_matches(tenant, operations))
            .map(|ids| QueryResult::with_identifiers(ConnectionType::Server, ids.to_vec()));
        self.finish(tenant, "bitmap", result)
    }

    async fn route_filtered_query(
        &self,
        tenant: &TenantKey,
        mode: OperatingMode,
        operations: &[FilterRequest],
    ) -> Result<CompositeResult, QueryError> {
        QueryMetrics::incr(&self.metrics.filtered_queries);
        let result = self.filtered(tenant, mode, operations).await;
        if let Ok(r) = &result {
            debug!(
                user_id = %tenant.user_id,
                mode = %mode,
                matches = r.total_matches(),
                round_trips = r.round_trips,
                "Filtered query served"
            );
        }
        self.finish(tenant, "filtered", result)
    }

    fn metrics(&self) -> QueryMetricsSnapshot {
        self.metrics.snapshot()
    }
}
