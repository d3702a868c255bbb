//! Bitmap Filter Engine
//!
//! Stateless apart from its metrics; one instance is shared by the query
//! router and the JSON handler.

use std::collections::HashSet;
use std::time::Instant;

use shared_types::{CardBitmapRecord, FilterResult, TenantKey};
use tracing::{debug, warn};

use crate::domain::{FilterConfig, FilterRequest};
use crate::error::FilterError;
use crate::metrics::{FilterMetrics, FilterMetricsSnapshot};
use crate::ports::BitmapFilterApi;

pub struct BitmapFilterEngine {
    config: FilterConfig,
    metrics: FilterMetrics,
}

impl BitmapFilterEngine {
    pub fn new() -> Self {
        Self::with_config(FilterConfig::default())
    }

    pub fn with_config(config: FilterConfig) -> Self {
        Self {
            config,
            metrics: FilterMetrics::new(),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}

impl Default for BitmapFilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BitmapFilterApi for BitmapFilterEngine {
    fn filter(
        &self,
        request: &FilterRequest,
        tenant: &TenantKey,
        cards: &[CardBitmapRecord],
    ) -> Result<FilterResult, FilterError> {
        let started = Instant::now();

        let predicate = tenant
            .validate()
            .map_err(FilterError::from)
            .and_then(|()| request.compile())
            .inspect_err(|e| {
                self.metrics.record_rejected();
                debug!(
                    user_id = %tenant.user_id,
                    workspace_id = %tenant.workspace_id,
                    kind = %request.kind(),
                    error = %e,
                    "Rejected filter request"
                );
            })?;

        // Tenant restriction happens before any bitmap is looked at.
        let own: Vec<&CardBitmapRecord> = cards.iter().filter(|c| c.belongs_to(tenant)).collect();
        let discarded = cards.len() - own.len();
        if discarded > 0 {
            warn!(
                user_id = %tenant.user_id,
                workspace_id = %tenant.workspace_id,
                discarded,
                "Discarded records belonging to another tenant"
            );
        }

        let mut seen = HashSet::new();
        let matched: Vec<String> = own
            .iter()
            .filter(|card| predicate.matches(&card.tag_bitmaps))
            .filter(|card| seen.insert(card.card_id.as_str()))
            .map(|card| card.card_id.clone())
            .collect();

        let elapsed = started.elapsed();
        self.metrics
            .record_filter(request.kind(), own.len(), discarded, elapsed);
        if elapsed > self.config.slow_threshold {
            self.metrics.record_slow();
            warn!(
                user_id = %tenant.user_id,
                workspace_id = %tenant.workspace_id,
                kind = %request.kind(),
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = self.config.slow_threshold.as_millis() as u64,
                cards = own.len(),
                "Slow bitmap filter"
            );
        }

        debug!(
            user_id = %tenant.user_id,
            workspace_id = %tenant.workspace_id,
            kind = %request.kind(),
            matches = matched.len(),
            "Bitmap filter complete"
        );

        Ok(FilterResult::new(matched, request.kind(), request.method()))
    }

    fn metrics(&self) -> FilterMetricsSnapshot {
        self.metrics.snapshot()
    }
}
