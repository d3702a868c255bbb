//! # Sync Payloads
//!
//! Untyped JSON objects from the client tier are validated here, in order:
//!
//! 1. content keys present => `PrivacyViolation` (before anything else)
//! 2. required keys absent => `MissingFields`
//! 3. any other key => `UnexpectedFields`
//! 4. wrong types, negative numbers, empty ids => `InvalidField`

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use shared_types::{forbidden_fields_in, Bitmap, CardBitmapRecord, TagBitmapRecord, TenantKey};

use crate::error::SyncError;

pub const CARD_PAYLOAD_KEYS: &[&str] = &["cardId", "userId", "workspaceId", "cardBitmap", "tagBitmaps"];
pub const TAG_PAYLOAD_KEYS: &[&str] = &["tagId", "userId", "workspaceId", "tagBitmap", "cardCount"];

/// Validated card bitmap payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardBitmapPayload {
    pub card_id: String,
    pub tenant_key: TenantKey,
    pub card_bitmap: Bitmap,
    pub tag_bitmaps: BTreeSet<Bitmap>,
}

/// Validated tag bitmap payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBitmapPayload {
    pub tag_id: String,
    pub tenant_key: TenantKey,
    pub tag_bitmap: Bitmap,
    pub card_count: u64,
}

impl CardBitmapPayload {
    pub fn from_json(value: &Value) -> Result<Self, SyncError> {
        let object = check_keys(value, CARD_PAYLOAD_KEYS)?;
        let tag_bitmaps = match &object["tagBitmaps"] {
            Value::Array(items) => items
                .iter()
                .map(|v| bitmap_value(v, "tagBitmaps"))
                .collect::<Result<BTreeSet<_>, _>>()?,
            _ => return Err(SyncError::invalid("tagBitmaps", "expected an array of integers")),
        };
        Ok(Self {
            card_id: id_field(object, "cardId")?,
            tenant_key: tenant_fields(object)?,
            card_bitmap: bitmap_value(&object["cardBitmap"], "cardBitmap")?,
            tag_bitmaps,
        })
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "cardId": self.card_id,
            "userId": self.tenant_key.user_id,
            "workspaceId": self.tenant_key.workspace_id,
            "cardBitmap": self.card_bitmap,
            "tagBitmaps": self.tag_bitmaps,
        })
    }
}

impl From<&CardBitmapRecord> for CardBitmapPayload {
    fn from(record: &CardBitmapRecord) -> Self {
        Self {
            card_id: record.card_id.clone(),
            tenant_key: record.tenant_key.clone(),
            card_bitmap: record.card_bitmap,
            tag_bitmaps: record.tag_bitmaps.clone(),
        }
    }
}

impl TagBitmapPayload {
    pub fn from_json(value: &Value) -> Result<Self, SyncError> {
        let object = check_keys(value, TAG_PAYLOAD_KEYS)?;
        Ok(Self {
            tag_id: id_field(object, "tagId")?,
            tenant_key: tenant_fields(object)?,
            tag_bitmap: bitmap_value(&object["tagBitmap"], "tagBitmap")?,
            card_count: bitmap_value(&object["cardCount"], "cardCount")?,
        })
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "tagId": self.tag_id,
            "userId": self.tenant_key.user_id,
            "workspaceId": self.tenant_key.workspace_id,
            "tagBitmap": self.tag_bitmap,
            "cardCount": self.card_count,
        })
    }
}

impl From<&TagBitmapRecord> for TagBitmapPayload {
    fn from(record: &TagBitmapRecord) -> Self {
        Self {
            tag_id: record.tag_id.clone(),
            tenant_key: record.tenant_key.clone(),
            tag_bitmap: record.tag_bitmap,
            card_count: record.card_count,
        }
    }
}

/// Best-effort tenant of a rejected payload, for log context.
pub fn claimed_tenant(value: &Value) -> Option<TenantKey> {
    let object = value.as_object()?;
    let user = object.get("userId")?.as_str()?;
    let workspace = object.get("workspaceId")?.as_str()?;
    TenantKey::try_new(user, workspace).ok()
}

/// Steps 1-3: forbidden, missing, then unexpected keys.
fn check_keys<'a>(value: &'a Value, required: &[&str]) -> Result<&'a Map<String, Value>, SyncError> {
    let Some(object) = value.as_object() else {
        return Err(SyncError::invalid("payload", "expected a JSON object"));
    };

    let forbidden = forbidden_fields_in(object.keys().map(String::as_str));
    if !forbidden.is_empty() {
        return Err(SyncError::PrivacyViolation { fields: forbidden });
    }

    let missing: Vec<String> = required
        .iter()
        .filter(|k| !object.contains_key(**k))
        .map(|k| k.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SyncError::MissingFields { fields: missing });
    }

    let mut unexpected: Vec<String> = object
        .keys()
        .filter(|k| !required.contains(&k.as_str()))
        .cloned()
        .collect();
    if !unexpected.is_empty() {
        unexpected.sort();
        return Err(SyncError::UnexpectedFields { fields: unexpected });
    }

    Ok(object)
}

fn id_field(object: &Map<String, Value>, field: &str) -> Result<String, SyncError> {
    match object[field].as_str() {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        Some(_) => Err(SyncError::invalid(field, "must not be empty")),
        None => Err(SyncError::invalid(field, "expected a string")),
    }
}

fn tenant_fields(object: &Map<String, Value>) -> Result<TenantKey, SyncError> {
    let user = object["userId"]
        .as_str()
        .ok_or_else(|| SyncError::invalid("userId", "expected a string"))?;
    let workspace = object["workspaceId"]
        .as_str()
        .ok_or_else(|| SyncError::invalid("workspaceId", "expected a string"))?;
    Ok(TenantKey::try_new(user, workspace)?)
}

/// Non-negative integer. Floats, negatives and strings are rejected.
fn bitmap_value(value: &Value, field: &str) -> Result<u64, SyncError> {
    value
        .as_u64()
        .ok_or_else(|| SyncError::invalid(field, "expected a non-negative integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card_json() -> Value {
        json!({
            "cardId": "c1",
            "userId": "u1",
            "workspaceId": "w1",
            "cardBitmap": 42,
            "tagBitmaps": [2, 1, 2]
        })
    }

    #[test]
    fn test_valid_card_payload() {
        let payload = CardBitmapPayload::from_json(&card_json()).unwrap();
        assert_eq!(payload.card_id, "c1");
        assert_eq!(payload.tenant_key, TenantKey::new("u1", "w1"));
        assert_eq!(payload.tag_bitmaps.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_privacy_checked_before_required_fields() {
        let err = CardBitmapPayload::from_json(&json!({ "cardId": "c1", "title": "secret" })).unwrap_err();
        assert_eq!(err, SyncError::PrivacyViolation { fields: vec!["title".into()] });

        let mut leaking = card_json();
        leaking["name"] = json!("leak");
        assert!(matches!(
            CardBitmapPayload::from_json(&leaking),
            Err(SyncError::PrivacyViolation { .. })
        ));
    }

    #[test]
    fn test_missing_fields_are_named() {
        let err = TagBitmapPayload::from_json(&json!({ "tagId": "t1", "userId": "u1" })).unwrap_err();
        assert_eq!(
            err,
            SyncError::MissingFields {
                fields: vec!["workspaceId".into(), "tagBitmap".into(), "cardCount".into()]
            }
        );
    }

    #[test]
    fn test_extra_fields_rejected() {
        let mut extra = card_json();
        extra["syncedAt"] = json!(1);
        assert_eq!(
            CardBitmapPayload::from_json(&extra).unwrap_err(),
            SyncError::UnexpectedFields { fields: vec!["syncedAt".into()] }
        );
    }

    #[test]
    fn test_type_errors() {
        let mut negative = card_json();
        negative["cardBitmap"] = json!(-1);
        assert!(matches!(
            CardBitmapPayload::from_json(&negative),
            Err(SyncError::InvalidField { field, .. }) if field == "cardBitmap"
        ));

        let mut float = card_json();
        float["tagBitmaps"] = json!([1.5]);
        assert!(CardBitmapPayload::from_json(&float).is_err());

        let mut empty_id = card_json();
        empty_id["cardId"] = json!("  ");
        assert!(CardBitmapPayload::from_json(&empty_id).is_err());

        let mut empty_tenant = card_json();
        empty_tenant["workspaceId"] = json!("");
        assert!(matches!(
            CardBitmapPayload::from_json(&empty_tenant),
            Err(SyncError::InvalidTenant(_))
        ));

        assert!(CardBitmapPayload::from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_to_json_revalidates() {
        let payload = CardBitmapPayload::from_json(&card_json()).unwrap();
        assert_eq!(CardBitmapPayload::from_json(&payload.to_json()).unwrap(), payload);
    }
}
