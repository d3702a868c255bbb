//! # Mode Routing
//!
//! The operating mode picks the tier: privacy → browser, normal → server,
//! dev → local. Bitmap operations always run on the server tier.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use shared_types::{Categorized, ConnectionType, ErrorKind, OperatingMode};
    use tv_02_bitmap_filter::FilterRequest;
    use tv_05_connection_router::{ConnectionParams, ConnectionRouterApi};
    use tv_06_query_router::{QueryError, QueryRouterApi};

    use crate::fixtures::{card, container, scenario_cards, tag_bitmap, tenant};

    fn params(pairs: &[(&str, &str)]) -> ConnectionParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_content_query_reads_the_tier_of_each_mode() {
        let container = container(OperatingMode::Normal);
        let u1 = tenant("u1");
        container.browser_content.insert(card(&u1, "from-browser", &[]));
        container.server_content.insert(card(&u1, "from-server", &[]));
        container.local_content.insert(card(&u1, "from-local", &[]));

        for (mode, tier, id) in [
            (OperatingMode::Privacy, ConnectionType::Browser, "from-browser"),
            (OperatingMode::Normal, ConnectionType::Server, "from-server"),
            (OperatingMode::Dev, ConnectionType::Local, "from-local"),
        ] {
            let result = container.query_router.route_content_query(&u1, mode).await.unwrap();
            assert_eq!(result.tier, Some(tier));
            assert_eq!(result.identifiers, vec![id.to_string()]);
        }

        // Every handle opened above was closed.
        assert_eq!(container.connections.stats().open_handles(), 0);
    }

    #[tokio::test]
    async fn test_normal_mode_filters_in_one_round_trip() {
        let container = container(OperatingMode::Normal);
        let u1 = tenant("u1");
        for c in scenario_cards(&u1) {
            container.server_content.insert(c);
        }

        let t1 = tag_bitmap(&container, &u1, "t1");
        let t3 = tag_bitmap(&container, &u1, "t3");
        let result = container
            .query_router
            .route_filtered_query(&u1, OperatingMode::Normal, &[FilterRequest::or([t1, t3])])
            .await
            .unwrap();
        assert_eq!(result.content_tier, ConnectionType::Server);
        assert_eq!(result.round_trips, 1);
        assert_eq!(result.matched_card_ids, vec!["c1", "c2", "c3"]);
    }

    #[tokio::test]
    async fn test_offline_tier_fails_with_connectivity() {
        let container = container(OperatingMode::Normal);
        container.server_content.set_offline(true);

        let result = container
            .query_handler()
            .content(&tenant("u1"), OperatingMode::Normal)
            .await;
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::Connectivity));
        assert_eq!(container.connections.stats().open_handles(), 0);
    }

    #[tokio::test]
    async fn test_slow_tier_times_out() {
        let container = container(OperatingMode::Dev);
        container.local_content.set_latency(Duration::from_secs(2));

        let err = container
            .query_router
            .route_content_query(&tenant("u1"), OperatingMode::Dev)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Timeout { tier: ConnectionType::Local, .. }));
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(container.query_router.metrics().timeouts, 1);
    }

    #[test]
    fn test_configured_urls_reach_the_handles() {
        let container = container(OperatingMode::Normal);
        let router = &container.connections;

        let normal = router
            .resolve_connection(OperatingMode::Normal, params(&[("auth_token", "secret")]))
            .unwrap();
        assert_eq!(normal.url(), Some(container.config.server_store_url.as_str()));
        assert_eq!(normal.param("auth_token"), Some("secret"));

        let privacy = router
            .switch_mode(
                &normal,
                OperatingMode::Privacy,
                params(&[("auth_token", "secret"), ("url", "https://elsewhere")]),
            )
            .unwrap();
        assert!(normal.is_closed());
        assert!(privacy.url().is_none());
        assert!(privacy.param("auth_token").is_none());
        assert!(privacy.param("url").is_none());
        assert_eq!(router.stats().params_dropped, 2);
    }

    #[test]
    fn test_unknown_mode_string_uses_the_server() {
        let container = container(OperatingMode::Normal);
        let handle = container
            .connections
            .resolve_connection_str("offline-first", ConnectionParams::new())
            .unwrap();
        assert_eq!(handle.mode(), OperatingMode::Normal);
        assert_eq!(handle.connection_type(), ConnectionType::Server);
    }
}
