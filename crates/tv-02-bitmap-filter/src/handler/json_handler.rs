//! JSON filter handler
//!
//! Request:
//!
//! ```json
//! { "kind": "AND", "tenantKey": { "userId": "u1", "workspaceId": "w1" }, "tagBitmaps": [1, 2] }
//! ```
//!
//! Response: `{ "cardIds": [...], "totalMatches": n, "operation": "AND", "method": "bitmap_intersection" }`.
//! Unknown keys are rejected, so content fields cannot ride along.

use std::sync::Arc;

use serde::Deserialize;
use shared_types::{Bitmap, FilterKind, FilterResult, TenantKey};

use crate::domain::FilterRequest;
use crate::error::FilterError;
use crate::ports::{BitmapFilterApi, CardBitmapSource};

/// Wire form of a filter request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FilterRequestWire {
    pub kind: FilterKind,
    pub tenant_key: TenantKey,
    #[serde(default)]
    pub tag_bitmap: Option<Bitmap>,
    #[serde(default)]
    pub tag_bitmaps: Option<Vec<Bitmap>>,
    #[serde(default)]
    pub include_bitmap: Option<Bitmap>,
    #[serde(default)]
    pub exclude_bitmap: Option<Bitmap>,
    #[serde(default)]
    pub expression: Option<String>,
}

impl FilterRequestWire {
    /// Build the typed request, checking the operands `kind` needs are present.
    pub fn into_request(self) -> Result<(TenantKey, FilterRequest), FilterError> {
        let missing = |field: &str| {
            FilterError::MalformedRequest(format!("{} request requires {field}", self.kind))
        };
        let request = match self.kind {
            FilterKind::Match => FilterRequest::Match {
                bitmap: self.tag_bitmap.ok_or_else(|| missing("tagBitmap"))?,
            },
            FilterKind::And => FilterRequest::and(
                self.tag_bitmaps.ok_or_else(|| missing("tagBitmaps"))?,
            ),
            FilterKind::Or => FilterRequest::or(
                self.tag_bitmaps.ok_or_else(|| missing("tagBitmaps"))?,
            ),
            FilterKind::Not => FilterRequest::Not {
                include: self.include_bitmap.ok_or_else(|| missing("includeBitmap"))?,
                exclude: self.exclude_bitmap.ok_or_else(|| missing("excludeBitmap"))?,
            },
            FilterKind::Complex => FilterRequest::complex(
                self.expression.ok_or_else(|| missing("expression"))?,
            ),
        };
        Ok((self.tenant_key, request))
    }
}

/// Decodes JSON requests, fetches the tenant's card bitmaps and filters them.
pub struct FilterHandler<E: BitmapFilterApi> {
    engine: Arc<E>,
    source: Arc<dyn CardBitmapSource>,
}

impl<E: BitmapFilterApi> FilterHandler<E> {
    pub fn new(engine: Arc<E>, source: Arc<dyn CardBitmapSource>) -> Self {
        Self { engine, source }
    }

    pub fn handle(&self, body: &serde_json::Value) -> Result<FilterResult, FilterError> {
        let wire: FilterRequestWire = serde_json::from_value(body.clone())
            .map_err(|e| FilterError::MalformedRequest(e.to_string()))?;
        let (tenant, request) = wire.into_request()?;
        let cards = self.source.card_records(&tenant)?;
        self.engine.filter(&request, &tenant, &cards)
    }

    /// Handle and serialise the response.
    pub fn handle_str(&self, body: &str) -> Result<String, FilterError> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| FilterError::MalformedRequest(e.to_string()))?;
        let result = self.handle(&value)?;
        serde_json::to_string(&result).map_err(|e| FilterError::MalformedRequest(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::BitmapFilterEngine;
    use serde_json::json;
    use shared_types::CardBitmapRecord;

    struct FixedSource(Vec<CardBitmapRecord>);

    impl CardBitmapSource for FixedSource {
        fn card_records(&self, _tenant: &TenantKey) -> Result<Vec<CardBitmapRecord>, FilterError> {
            Ok(self.0.clone())
        }
    }

    fn handler() -> FilterHandler<BitmapFilterEngine> {
        let t1 = TenantKey::new("u1", "w1");
        let t2 = TenantKey::new("u2", "w2");
        let rec = |id: &str, t: &TenantKey, tags: &[Bitmap]| CardBitmapRecord {
            card_id: id.into(),
            tenant_key: t.clone(),
            card_bitmap: 0,
            tag_bitmaps: tags.iter().copied().collect(),
            checksum: String::new(),
        };
        let source = FixedSource(vec![
            rec("c1", &t1, &[1, 2]),
            rec("c2", &t1, &[2, 3]),
            rec("c3", &t1, &[1, 3]),
            rec("other", &t2, &[1, 2, 3]),
        ]);
        FilterHandler::new(Arc::new(BitmapFilterEngine::new()), Arc::new(source))
    }

    fn tenant() -> serde_json::Value {
        json!({ "userId": "u1", "workspaceId": "w1" })
    }

    #[test]
    fn test_and_request() {
        let result = handler()
            .handle(&json!({ "kind": "AND", "tenantKey": tenant(), "tagBitmaps": [1, 2] }))
            .unwrap();
        assert_eq!(result.matched_card_ids, vec!["c1"]);
    }

    #[test]
    fn test_not_request_wire_response() {
        let body = json!({
            "kind": "NOT",
            "tenantKey": tenant(),
            "includeBitmap": 1,
            "excludeBitmap": 3
        })
        .to_string();
        let response: serde_json::Value =
            serde_json::from_str(&handler().handle_str(&body).unwrap()).unwrap();
        assert_eq!(
            response,
            json!({ "cardIds": ["c1"], "totalMatches": 1, "operation": "NOT", "method": "bitmap_exclusion" })
        );
    }

    #[test]
    fn test_complex_request() {
        let result = handler()
            .handle(&json!({ "kind": "COMPLEX", "tenantKey": tenant(), "expression": "2 and 3 or 1 not 2" }))
            .unwrap();
        assert_eq!(result.matched_card_ids, vec!["c2", "c3"]);
    }

    #[test]
    fn test_missing_operand_is_malformed() {
        let err = handler()
            .handle(&json!({ "kind": "MATCH", "tenantKey": tenant() }))
            .unwrap_err();
        assert!(matches!(err, FilterError::MalformedRequest(m) if m.contains("tagBitmap")));
    }

    #[test]
    fn test_content_keys_rejected() {
        let err = handler()
            .handle(&json!({ "kind": "MATCH", "tenantKey": tenant(), "tagBitmap": 1, "name": "x" }))
            .unwrap_err();
        assert!(matches!(err, FilterError::MalformedRequest(_)));
    }
}
