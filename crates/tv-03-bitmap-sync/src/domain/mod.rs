//! Domain Layer
//!
//! Payload validation, checksums and result shapes. No I/O.

pub mod checksum;
pub mod payload;
pub mod snapshot;

pub use checksum::{card_checksum, tag_checksum};
pub use payload::{claimed_tenant, CardBitmapPayload, TagBitmapPayload, CARD_PAYLOAD_KEYS, TAG_PAYLOAD_KEYS};
pub use snapshot::{BitmapSnapshot, SyncReceipt};
