//! # Tenant Isolation
//!
//! Two tenants using the same tag and card ids never see each other's data,
//! even when a foreign record carries the exact bitmap being queried.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use shared_types::{CardBitmapRecord, OperatingMode};
    use tv_01_set_algebra::{SetAlgebraApi, TagSet};
    use tv_02_bitmap_filter::{BitmapFilterApi, BitmapFilterEngine, FilterRequest};
    use tv_03_bitmap_sync::BitmapSyncApi;
    use tv_06_query_router::QueryRouterApi;

    use crate::fixtures::{container, scenario_cards, sync_browser_cards, tag_bitmap, tenant};

    #[tokio::test]
    async fn test_same_tag_ids_fingerprint_differently_per_tenant() {
        let container = container(OperatingMode::Privacy);
        let (u1, u2) = (tenant("u1"), tenant("u2"));
        sync_browser_cards(&container, &u1, scenario_cards(&u1)).await;
        sync_browser_cards(&container, &u2, scenario_cards(&u2)).await;

        assert_ne!(
            tag_bitmap(&container, &u1, "t1"),
            tag_bitmap(&container, &u2, "t1")
        );

        // u2's fingerprint of t1 matches nothing for u1.
        let foreign = tag_bitmap(&container, &u2, "t1");
        let result = container
            .query_router
            .route_bitmap_operation(&u1, &[FilterRequest::Match { bitmap: foreign }])
            .await
            .unwrap();
        assert!(result.identifiers.is_empty());

        let own = tag_bitmap(&container, &u1, "t1");
        let result = container
            .query_router
            .route_filtered_query(&u1, OperatingMode::Privacy, &[FilterRequest::Match { bitmap: own }])
            .await
            .unwrap();
        assert_eq!(result.matched_card_ids, vec!["c1", "c3"]);
        assert!(result.records.iter().all(|r| r.tenant_key == u1));
    }

    #[tokio::test]
    async fn test_bitmap_snapshots_are_tenant_scoped() {
        let container = container(OperatingMode::Privacy);
        let (u1, u2) = (tenant("u1"), tenant("u2"));
        sync_browser_cards(&container, &u1, scenario_cards(&u1)).await;

        assert_eq!(container.bitmap_sync.query_bitmaps(&u1).unwrap().cards.len(), 3);
        assert!(container.bitmap_sync.query_bitmaps(&u2).unwrap().is_empty());
    }

    #[test]
    fn test_filter_discards_foreign_record_with_shared_bitmap() {
        let engine = BitmapFilterEngine::new();
        let (u1, u2) = (tenant("u1"), tenant("u2"));
        let record = |tenant: &shared_types::TenantKey, id: &str| CardBitmapRecord {
            card_id: id.into(),
            tenant_key: tenant.clone(),
            card_bitmap: 100,
            tag_bitmaps: BTreeSet::from([7, 8]),
            checksum: "x".into(),
        };
        let records = vec![record(&u1, "mine"), record(&u2, "theirs")];

        let result = engine.filter(&FilterRequest::and([7, 8]), &u1, &records).unwrap();
        assert_eq!(result.matched_card_ids, vec!["mine".to_string()]);
        assert_eq!(engine.metrics().foreign_records_discarded, 1);
    }

    #[test]
    fn test_set_algebra_cache_is_scoped() {
        let container = container(OperatingMode::Normal);
        let algebra = &container.set_algebra;
        let (u1, u2) = (tenant("u1"), tenant("u2"));
        let sets = [TagSet::from_iter(["c1", "c2"]), TagSet::from_iter(["c2", "c3"])];

        algebra.clear_cache();
        algebra.intersect(Some(&u1), &sets);
        algebra.intersect(Some(&u2), &sets);
        assert_eq!(algebra.cache_statistics().misses, 2);

        let again = algebra.intersect(Some(&u1), &sets);
        assert_eq!(again, TagSet::from_iter(["c2"]));
        assert_eq!(algebra.cache_statistics().hits, 1);
    }
}
