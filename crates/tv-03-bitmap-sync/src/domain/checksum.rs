//! Server-side record checksums.
//!
//! Computed over the canonical bitmap fields only; payloads never carry
//! content, so there is nothing else to hash.

use std::collections::BTreeSet;

use shared_crypto::sha256_hex;
use shared_types::Bitmap;

/// `sha256("card|<bitmap>|<sorted tags, comma separated>")`
pub fn card_checksum(card_bitmap: Bitmap, tag_bitmaps: &BTreeSet<Bitmap>) -> String {
    let tags: Vec<String> = tag_bitmaps.iter().map(Bitmap::to_string).collect();
    sha256_hex(format!("card|{card_bitmap}|{}", tags.join(",")).as_bytes())
}

/// `sha256("tag|<bitmap>|<card count>")`
pub fn tag_checksum(tag_bitmap: Bitmap, card_count: u64) -> String {
    sha256_hex(format!("tag|{tag_bitmap}|{card_count}").as_bytes())
}
