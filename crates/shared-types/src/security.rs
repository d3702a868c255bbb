//! # Privacy Boundary Checks
//!
//! The single list of content keys that must never reach the server tier, and
//! the tenant equality check every subsystem uses before touching records.

use crate::entities::TenantKey;
use crate::errors::TenantMismatch;

/// Keys that identify content. Any payload carrying one of these is a privacy
/// violation, regardless of its value.
pub const FORBIDDEN_CONTENT_FIELDS: &[&str] = &["name", "description", "content", "title", "color"];

/// Whether `key` names a content field.
pub fn is_content_field(key: &str) -> bool {
    FORBIDDEN_CONTENT_FIELDS.contains(&key)
}

/// Collect the content keys present in `keys`, sorted and de-duplicated.
pub fn forbidden_fields_in<'a, I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut found: Vec<String> = keys
        .into_iter()
        .filter(|k| is_content_field(k))
        .map(str::to_string)
        .collect();
    found.sort();
    found.dedup();
    found
}

/// Fail unless `found` is the caller's tenant.
pub fn ensure_same_tenant(expected: &TenantKey, found: &TenantKey) -> Result<(), TenantMismatch> {
    if expected == found {
        Ok(())
    } else {
        Err(TenantMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }
}
