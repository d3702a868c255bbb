//! # Content Smuggling
//!
//! A client adds content keys to a bitmap payload, hoping the server stores
//! them alongside the fingerprints.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared_types::{ErrorKind, OperatingMode};
    use tv_03_bitmap_sync::BitmapSyncApi;

    use crate::fixtures::{container, tenant};

    #[test]
    fn test_named_card_payload_is_refused() {
        let container = container(OperatingMode::Privacy);
        let result = container.sync_handler().handle_card(&json!({
            "cardId": "c1",
            "userId": "u1",
            "workspaceId": "w1",
            "cardBitmap": 42,
            "tagBitmaps": [1, 2],
            "name": "leak"
        }));

        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::PrivacyViolation));
        // Field names only, never values.
        let message = result.error_message.unwrap();
        assert!(message.contains("name"));
        assert!(!message.contains("leak"));
        assert!(container.bitmap_sync.query_bitmaps(&tenant("u1")).unwrap().is_empty());
        assert_eq!(container.bitmap_sync.stats().privacy_rejections, 1);
    }

    #[test]
    fn test_every_content_key_is_refused_on_tags() {
        let container = container(OperatingMode::Privacy);
        let handler = container.sync_handler();

        for key in ["name", "description", "content", "title", "color"] {
            let mut payload = json!({
                "tagId": "t1",
                "userId": "u1",
                "workspaceId": "w1",
                "tagBitmap": 9,
                "cardCount": 3
            });
            payload[key] = json!("secret");
            let result = handler.handle_tag(&payload);
            assert_eq!(result.error_kind, Some(ErrorKind::PrivacyViolation), "{key}");
        }
        assert!(container.bitmap_sync.query_bitmaps(&tenant("u1")).unwrap().is_empty());
    }

    #[test]
    fn test_content_under_another_key_is_refused() {
        let container = container(OperatingMode::Privacy);
        let result = container.sync_handler().handle_card(&json!({
            "cardId": "c1",
            "userId": "u1",
            "workspaceId": "w1",
            "cardBitmap": 42,
            "tagBitmaps": [1, 2],
            "notes": "leak"
        }));

        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::Validation));
        assert!(container.bitmap_sync.query_bitmaps(&tenant("u1")).unwrap().is_empty());
    }

    #[test]
    fn test_clean_payload_is_accepted() {
        let container = container(OperatingMode::Privacy);
        let result = container.sync_handler().handle_card(&json!({
            "cardId": "c1",
            "userId": "u1",
            "workspaceId": "w1",
            "cardBitmap": 42,
            "tagBitmaps": [1, 2]
        }));

        assert!(result.success);
        assert_eq!(result.identifiers, vec!["c1".to_string()]);
        let snapshot = container.bitmap_sync.query_bitmaps(&tenant("u1")).unwrap();
        assert_eq!(snapshot.cards[0].card_bitmap, 42);
    }
}
