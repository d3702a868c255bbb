//! # Obfuscation
//!
//! Content records in, opaque bitmap records out.
//!
//! - card bitmap = fingerprint(`card`, card id)
//! - tag bitmaps = fingerprint(`tag`, tag id) for each tag on the card
//! - checksum = HMAC-SHA256 hex over the canonical content fields
//!
//! All three are keyed by the tenant's `ObfuscationKey`, so the same card in
//! two tenants yields unrelated values. Content is dropped.

use std::collections::BTreeSet;

use shared_crypto::ObfuscationKey;
use shared_types::{Bitmap, CardBitmapRecord, CardContent, TagBitmapRecord, TagContent};

pub const CARD_DOMAIN: &str = "card";
pub const TAG_DOMAIN: &str = "tag";

pub fn card_bitmap(key: &ObfuscationKey, card_id: &str) -> Bitmap {
    key.fingerprint(CARD_DOMAIN, card_id)
}

pub fn tag_bitmap(key: &ObfuscationKey, tag_id: &str) -> Bitmap {
    key.fingerprint(TAG_DOMAIN, tag_id)
}

/// Keyed checksum of a card's content. Tag ids are sorted and de-duplicated
/// first, so tag order does not count as drift.
pub fn card_checksum(key: &ObfuscationKey, card: &CardContent) -> String {
    let tag_ids: BTreeSet<&str> = card.tag_ids.iter().map(String::as_str).collect();
    let mut parts: Vec<&[u8]> = vec![
        CARD_DOMAIN.as_bytes(),
        card.card_id.as_bytes(),
        card.title.as_bytes(),
        card.description.as_bytes(),
        card.content.as_bytes(),
    ];
    parts.extend(tag_ids.iter().map(|id| id.as_bytes()));
    key.mac_hex(&parts)
}

pub fn tag_checksum(key: &ObfuscationKey, tag: &TagContent) -> String {
    key.mac_hex(&[
        TAG_DOMAIN.as_bytes(),
        tag.tag_id.as_bytes(),
        tag.name.as_bytes(),
        tag.color.as_deref().unwrap_or("").as_bytes(),
    ])
}

pub fn obfuscate_card(key: &ObfuscationKey, card: &CardContent) -> CardBitmapRecord {
    CardBitmapRecord {
        card_id: card.card_id.clone(),
        tenant_key: card.tenant_key.clone(),
        card_bitmap: card_bitmap(key, &card.card_id),
        tag_bitmaps: card.tag_ids.iter().map(|id| tag_bitmap(key, id)).collect(),
        checksum: card_checksum(key, card),
    }
}

pub fn obfuscate_tag(key: &ObfuscationKey, tag: &TagContent, card_count: u64) -> TagBitmapRecord {
    TagBitmapRecord {
        tag_id: tag.tag_id.clone(),
        tenant_key: tag.tenant_key.clone(),
        tag_bitmap: tag_bitmap(key, &tag.tag_id),
        checksum: tag_checksum(key, tag),
        card_count,
    }
}

/// True iff `card` still matches the content `record` was derived from.
pub fn verify_card_checksum(key: &ObfuscationKey, record: &CardBitmapRecord, card: &CardContent) -> bool {
    record.card_id == card.card_id
        && record.tenant_key == card.tenant_key
        && record.checksum == card_checksum(key, card)
}
