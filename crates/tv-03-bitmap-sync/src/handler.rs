//! Wire handler
//!
//! Turns service outcomes into `SyncResult` / `QueryResult` records. Errors
//! are reported by message and kind; payload values are never echoed back.

use std::sync::Arc;

use serde_json::Value;
use shared_types::{ConnectionType, QueryResult, SyncResult, TenantKey};

use crate::ports::BitmapSyncApi;

pub struct SyncHandler<A: BitmapSyncApi> {
    api: Arc<A>,
}

impl<A: BitmapSyncApi> SyncHandler<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub fn handle_card(&self, payload: &Value) -> SyncResult {
        match self.api.sync_card_bitmap(payload) {
            Ok(receipt) => SyncResult::ok(vec![receipt.id]),
            Err(e) => SyncResult::failure(&e),
        }
    }

    pub fn handle_tag(&self, payload: &Value) -> SyncResult {
        match self.api.sync_tag_bitmap(payload) {
            Ok(receipt) => SyncResult::ok(vec![receipt.id]),
            Err(e) => SyncResult::failure(&e),
        }
    }

    /// Card ids followed by tag ids of the tenant's snapshot.
    pub fn handle_query(&self, tenant: &TenantKey) -> QueryResult {
        match self.api.query_bitmaps(tenant) {
            Ok(snapshot) => {
                let ids = snapshot
                    .cards
                    .into_iter()
                    .map(|c| c.card_id)
                    .chain(snapshot.tags.into_iter().map(|t| t.tag_id))
                    .collect();
                QueryResult::with_identifiers(ConnectionType::Server, ids)
            }
            Err(e) => QueryResult::failure(&e),
        }
    }

    pub fn handle_delete_card(&self, tenant: &TenantKey, card_id: &str) -> SyncResult {
        match self.api.delete_card_bitmap(tenant, card_id) {
            Ok(true) => SyncResult::ok(vec![card_id.to_string()]),
            Ok(false) => SyncResult::ok(Vec::new()),
            Err(e) => SyncResult::failure(&e),
        }
    }

    pub fn handle_delete_tag(&self, tenant: &TenantKey, tag_id: &str) -> SyncResult {
        match self.api.delete_tag_bitmap(tenant, tag_id) {
            Ok(true) => SyncResult::ok(vec![tag_id.to_string()]),
            Ok(false) => SyncResult::ok(Vec::new()),
            Err(e) => SyncResult::failure(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryBitmapStore;
    use crate::service::BitmapSyncService;
    use serde_json::json;
    use shared_types::ErrorKind;

    fn handler() -> SyncHandler<BitmapSyncService<InMemoryBitmapStore>> {
        SyncHandler::new(Arc::new(BitmapSyncService::new(Arc::new(
            InMemoryBitmapStore::new(),
        ))))
    }

    #[test]
    fn test_leak_is_reported_without_values() {
        let result = handler().handle_card(&json!({
            "cardId": "c1", "userId": "u1", "workspaceId": "w1",
            "cardBitmap": 42, "tagBitmaps": [1, 2], "description": "my diary"
        }));
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::PrivacyViolation));
        let message = result.error_message.unwrap();
        assert!(message.contains("description"));
        assert!(!message.contains("my diary"));
    }

    #[test]
    fn test_sync_then_query() {
        let h = handler();
        let ok = h.handle_card(&json!({
            "cardId": "c1", "userId": "u1", "workspaceId": "w1", "cardBitmap": 7, "tagBitmaps": [3]
        }));
        assert!(ok.success);
        assert_eq!(ok.identifiers, vec!["c1"]);
        h.handle_tag(&json!({
            "tagId": "t3", "userId": "u1", "workspaceId": "w1", "tagBitmap": 3, "cardCount": 1
        }));

        let query = h.handle_query(&TenantKey::new("u1", "w1"));
        assert!(query.success);
        assert_eq!(query.tier, Some(ConnectionType::Server));
        assert_eq!(query.identifiers, vec!["c1", "t3"]);

        let deleted = h.handle_delete_card(&TenantKey::new("u1", "w1"), "c1");
        assert_eq!(deleted.identifiers, vec!["c1"]);
    }

    #[test]
    fn test_invalid_tenant_query_fails() {
        let result = handler().handle_query(&TenantKey::new("", "w1"));
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::Validation));
    }
}
