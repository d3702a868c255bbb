//! # Leaky Tier
//!
//! A compromised or misconfigured content store answers with another
//! tenant's records. The router must fail the whole call instead of
//! passing any of them through.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use shared_types::{
        CardContent, Categorized, ConnectionType, ErrorKind, OperatingMode, TenantKey,
    };
    use tagvault_runtime::ServiceContainer;
    use tv_05_connection_router::ConnectionRouterApi;
    use tv_02_bitmap_filter::FilterRequest;
    use tv_06_query_router::{ContentTier, QueryHandler, QueryRouter, QueryRouterApi, TierError};

    use crate::fixtures::{card, container, scenario_cards, sync_browser_cards, tag_bitmap, tenant};

    /// Answers every call with the requested tenant's card plus a stranger's.
    struct LeakyTier {
        connection_type: ConnectionType,
    }

    impl LeakyTier {
        fn records(&self, owner: &TenantKey) -> Vec<CardContent> {
            vec![card(owner, "c1", &[]), card(&tenant("mallory"), "stolen", &[])]
        }
    }

    #[async_trait]
    impl ContentTier for LeakyTier {
        fn connection_type(&self) -> ConnectionType {
            self.connection_type
        }

        async fn resolve_content_by_ids(
            &self,
            tenant: &TenantKey,
            _ids: &[String],
        ) -> Result<Vec<CardContent>, TierError> {
            Ok(self.records(tenant))
        }

        async fn read_local_content(&self, tenant: &TenantKey) -> Result<Vec<CardContent>, TierError> {
            Ok(self.records(tenant))
        }

        async fn filter_content(
            &self,
            tenant: &TenantKey,
            _operations: &[FilterRequest],
        ) -> Result<Vec<CardContent>, TierError> {
            Ok(self.records(tenant))
        }
    }

    fn router_with_leaky(
        container: &ServiceContainer,
        connection_type: ConnectionType,
    ) -> QueryRouter {
        QueryRouter::new(
            container.connections.clone(),
            container.filter_engine.clone(),
            container.bitmap_sync.clone(),
            container.set_algebra.clone(),
        )
        .with_tier(Arc::new(LeakyTier { connection_type }))
    }

    #[tokio::test]
    async fn test_leaky_browser_fails_privacy_filtered_query() {
        let container = container(OperatingMode::Privacy);
        let u1 = tenant("u1");
        sync_browser_cards(&container, &u1, scenario_cards(&u1)).await;
        let router = router_with_leaky(&container, ConnectionType::Browser);

        let t1 = tag_bitmap(&container, &u1, "t1");
        let handler = QueryHandler::new(Arc::new(router));
        let result = handler
            .filtered(&u1, OperatingMode::Privacy, &[FilterRequest::Match { bitmap: t1 }])
            .await;

        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::TenantIsolation));
        assert!(result.records.is_empty());
        assert!(result.identifiers.is_empty());
    }

    #[tokio::test]
    async fn test_leaky_server_fails_content_query() {
        let container = container(OperatingMode::Normal);
        let router = router_with_leaky(&container, ConnectionType::Server);

        let err = router
            .route_content_query(&tenant("u1"), OperatingMode::Normal)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TenantIsolation);
        assert_eq!(router.metrics().isolation_violations, 1);
        assert_eq!(router.metrics().failed_queries, 1);
        assert_eq!(container.connections.stats().open_handles(), 0);
    }
}
