//! # Mode Policies
//!
//! One immutable [`ModePolicy`] per operating mode, loaded once into a
//! [`ModePolicyTable`]. Lookups for a mode with no entry use the Normal
//! policy.

use std::collections::{BTreeSet, HashMap};

use shared_types::{ConnectionType, OperatingMode};

pub const DEFAULT_LOCAL_STORE_URL: &str = "file:tagvault-dev.db";
pub const DEFAULT_SERVER_STORE_URL: &str = "https://store.tagvault.local";

const SHARED_PARAMS: &[&str] = &["user_id", "workspace_id", "timeout_ms", "read_only"];

/// Connection rules for one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModePolicy {
    pub connection_type: ConnectionType,
    /// `None` for browser connections.
    pub store_url: Option<String>,
    pub allowed_param_keys: BTreeSet<String>,
    pub forbidden_param_keys: BTreeSet<String>,
}

impl ModePolicy {
    pub fn new(connection_type: ConnectionType, store_url: Option<String>) -> Self {
        Self {
            connection_type,
            store_url,
            allowed_param_keys: BTreeSet::new(),
            forbidden_param_keys: BTreeSet::new(),
        }
    }

    pub fn allow(mut self, keys: &[&str]) -> Self {
        self.allowed_param_keys
            .extend(keys.iter().map(|k| k.to_string()));
        self
    }

    pub fn forbid(mut self, keys: &[&str]) -> Self {
        self.forbidden_param_keys
            .extend(keys.iter().map(|k| k.to_string()));
        self
    }

    /// Local store, authenticated.
    pub fn dev(local_url: impl Into<String>) -> Self {
        Self::new(ConnectionType::Local, Some(local_url.into()))
            .allow(SHARED_PARAMS)
            .allow(&["auth_token"])
            .forbid(&["sync_url", "encryption_key"])
    }

    /// Server-hosted store, authenticated.
    pub fn normal(server_url: impl Into<String>) -> Self {
        Self::new(ConnectionType::Server, Some(server_url.into()))
            .allow(SHARED_PARAMS)
            .allow(&["auth_token"])
            .forbid(&["sync_url", "encryption_key"])
    }

    /// Browser store. No URL and no credentials may be passed through.
    pub fn privacy() -> Self {
        Self::new(ConnectionType::Browser, None)
            .allow(SHARED_PARAMS)
            .forbid(&["url", "auth_token", "sync_url", "encryption_key"])
    }

    pub fn is_allowed(&self, key: &str) -> bool {
        self.allowed_param_keys.contains(key)
    }

    pub fn is_forbidden(&self, key: &str) -> bool {
        self.forbidden_param_keys.contains(key)
    }
}

#[derive(Debug, Clone)]
pub struct ModePolicyTable {
    policies: HashMap<OperatingMode, ModePolicy>,
    fallback: ModePolicy,
}

impl ModePolicyTable {
    /// A table whose only policy is the Normal fallback.
    pub fn new(fallback: ModePolicy) -> Self {
        Self {
            policies: HashMap::new(),
            fallback,
        }
    }

    pub fn with_policy(mut self, mode: OperatingMode, policy: ModePolicy) -> Self {
        self.policies.insert(mode, policy);
        self
    }

    pub fn with_urls(local_url: impl Into<String>, server_url: impl Into<String>) -> Self {
        let normal = ModePolicy::normal(server_url);
        Self::new(normal.clone())
            .with_policy(OperatingMode::Dev, ModePolicy::dev(local_url))
            .with_policy(OperatingMode::Normal, normal)
            .with_policy(OperatingMode::Privacy, ModePolicy::privacy())
    }

    /// Policy for `mode`, or the Normal fallback when the table has none.
    pub fn policy_for(&self, mode: OperatingMode) -> &ModePolicy {
        self.policies.get(&mode).unwrap_or(&self.fallback)
    }

    pub fn has_entry(&self, mode: OperatingMode) -> bool {
        self.policies.contains_key(&mode)
    }
}

impl Default for ModePolicyTable {
    fn default() -> Self {
        Self::with_urls(DEFAULT_LOCAL_STORE_URL, DEFAULT_SERVER_STORE_URL)
    }
}
