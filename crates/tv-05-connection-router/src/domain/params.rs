//! Connection parameter sanitization.

use std::collections::BTreeMap;

use super::ModePolicy;

/// Caller-supplied connection parameters.
pub type ConnectionParams = BTreeMap<String, String>;

/// Result of partitioning parameters against a policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedParams {
    pub kept: ConnectionParams,
    /// Keys the policy forbids, sorted.
    pub forbidden: Vec<String>,
    /// Keys the policy neither allows nor forbids, sorted.
    pub unknown: Vec<String>,
}

impl SanitizedParams {
    pub fn dropped(&self) -> usize {
        self.forbidden.len() + self.unknown.len()
    }
}

/// Keep allowed keys; drop everything else. Forbidden wins over allowed.
pub fn sanitize(policy: &ModePolicy, params: ConnectionParams) -> SanitizedParams {
    let mut out = SanitizedParams::default();
    for (key, value) in params {
        if policy.is_forbidden(&key) {
            out.forbidden.push(key);
        } else if policy.is_allowed(&key) {
            out.kept.insert(key, value);
        } else {
            out.unknown.push(key);
        }
    }
    out
}
