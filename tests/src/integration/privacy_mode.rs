//! # Privacy Mode Flow
//!
//! Content stays in the browser store. The server tier only ever receives
//! fingerprints, and a filtered query takes two round trips: bitmap
//! evaluation on the server, then content resolution in the browser.

#[cfg(test)]
mod tests {
    use shared_types::{ConnectionType, OperatingMode};
    use tv_02_bitmap_filter::FilterRequest;
    use tv_03_bitmap_sync::BitmapSyncApi;
    use tv_04_replica_manager::ReplicaManagerApi;
    use tv_06_query_router::QueryRouterApi;

    use crate::fixtures::{container, scenario_cards, sync_browser_cards, tag_bitmap, tenant};

    fn ids(records: &[shared_types::CardContent]) -> Vec<&str> {
        records.iter().map(|r| r.card_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_filtered_query_resolves_content_in_the_browser() {
        let container = container(OperatingMode::Privacy);
        let u1 = tenant("u1");
        let summary = sync_browser_cards(&container, &u1, scenario_cards(&u1)).await;
        assert_eq!(summary.cards_written, 3);
        assert_eq!(summary.tags_written, 3);
        assert!(summary.forwarded);

        let t1 = tag_bitmap(&container, &u1, "t1");
        let t2 = tag_bitmap(&container, &u1, "t2");
        let t3 = tag_bitmap(&container, &u1, "t3");
        let router = &container.query_router;

        let and = router
            .route_filtered_query(&u1, OperatingMode::Privacy, &[FilterRequest::and([t1, t2])])
            .await
            .unwrap();
        assert_eq!(and.content_tier, ConnectionType::Browser);
        assert_eq!(and.round_trips, 2);
        assert_eq!(ids(&and.records), vec!["c1"]);
        assert_eq!(and.records[0].title, "Private title of c1");

        let or = router
            .route_filtered_query(&u1, OperatingMode::Privacy, &[FilterRequest::or([t1, t3])])
            .await
            .unwrap();
        assert_eq!(ids(&or.records), vec!["c1", "c2", "c3"]);

        let not = router
            .route_filtered_query(
                &u1,
                OperatingMode::Privacy,
                &[FilterRequest::Not { include: t1, exclude: t3 }],
            )
            .await
            .unwrap();
        assert_eq!(ids(&not.records), vec!["c1"]);

        let complex = router
            .route_filtered_query(
                &u1,
                OperatingMode::Privacy,
                &[FilterRequest::complex(format!("({t1} OR {t2}) NOT {t3}"))],
            )
            .await
            .unwrap();
        assert_eq!(ids(&complex.records), vec!["c1"]);
    }

    #[tokio::test]
    async fn test_server_store_holds_no_content() {
        let container = container(OperatingMode::Privacy);
        let u1 = tenant("u1");
        sync_browser_cards(&container, &u1, scenario_cards(&u1)).await;

        let snapshot = container.bitmap_sync.query_bitmaps(&u1).unwrap();
        assert_eq!(snapshot.cards.len(), 3);
        assert_eq!(snapshot.tags.len(), 3);

        let stored = serde_json::to_string(&snapshot).unwrap();
        assert!(!stored.contains("Private"));
        assert!(!stored.contains("#ff0000"));
        assert!(!stored.contains("\"name\""));
        assert!(!stored.contains("\"title\""));
    }

    #[tokio::test]
    async fn test_replica_rows_verify_against_browser_content() {
        let container = container(OperatingMode::Privacy);
        let u1 = tenant("u1");
        let cards = scenario_cards(&u1);
        sync_browser_cards(&container, &u1, cards.clone()).await;

        let row = container.replicas.read_card_row(&u1, "c2").await.unwrap().unwrap();
        assert_eq!(row.tag_bitmaps.len(), 2);

        let record = container.replicas.obfuscate_card(&cards[1]);
        assert_eq!(row.checksum, record.checksum);
        assert!(container.replicas.verify_card_checksum(&record, &cards[1]));

        let mut edited = cards[1].clone();
        edited.content.push_str(" (edited)");
        assert!(!container.replicas.verify_card_checksum(&record, &edited));
    }

    #[tokio::test]
    async fn test_deleting_a_card_removes_it_from_bitmap_queries() {
        let container = container(OperatingMode::Privacy);
        let u1 = tenant("u1");
        sync_browser_cards(&container, &u1, scenario_cards(&u1)).await;

        container
            .replicas
            .sync_browser_to_server(
                &u1,
                tv_04_replica_manager::BrowserSnapshot {
                    deleted_card_ids: vec!["c1".into()],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let t1 = tag_bitmap(&container, &u1, "t1");
        let result = container
            .query_router
            .route_bitmap_operation(&u1, &[FilterRequest::Match { bitmap: t1 }])
            .await
            .unwrap();
        assert_eq!(result.identifiers, vec!["c3".to_string()]);
    }

    #[tokio::test]
    async fn test_no_matches_resolves_nothing() {
        let container = container(OperatingMode::Privacy);
        let u1 = tenant("u1");
        sync_browser_cards(&container, &u1, scenario_cards(&u1)).await;

        let unknown = tag_bitmap(&container, &u1, "never-used");
        let result = container
            .query_router
            .route_filtered_query(&u1, OperatingMode::Privacy, &[FilterRequest::Match { bitmap: unknown }])
            .await
            .unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.total_matches(), 0);
    }
}
