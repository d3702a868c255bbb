//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Isolation**: `TenantKey`
//! - **Topology**: `OperatingMode`, `ConnectionType`
//! - **Server tier (opaque)**: `Bitmap`, `CardBitmapRecord`, `TagBitmapRecord`
//! - **Content tier**: `CardContent`, `TagContent`

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::{ParseModeError, TenantKeyError};

// =============================================================================
// CLUSTER A: ISOLATION
// =============================================================================

/// Opaque integer fingerprint standing in for a card or tag.
pub type Bitmap = u64;

/// The (user, workspace) pair that scopes every record and operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantKey {
    /// Owning user.
    pub user_id: String,
    /// Workspace within the user's account.
    pub workspace_id: String,
}

impl TenantKey {
    /// Build a key without validation.
    ///
    /// Prefer [`TenantKey::try_new`] at trust boundaries.
    pub fn new(user_id: impl Into<String>, workspace_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            workspace_id: workspace_id.into(),
        }
    }

    /// Build a key, rejecting empty components.
    pub fn try_new(
        user_id: impl Into<String>,
        workspace_id: impl Into<String>,
    ) -> Result<Self, TenantKeyError> {
        let key = Self::new(user_id, workspace_id);
        key.validate()?;
        Ok(key)
    }

    /// Check that both components are non-empty.
    pub fn validate(&self) -> Result<(), TenantKeyError> {
        if self.user_id.trim().is_empty() {
            return Err(TenantKeyError::EmptyUserId);
        }
        if self.workspace_id.trim().is_empty() {
            return Err(TenantKeyError::EmptyWorkspaceId);
        }
        Ok(())
    }
}

impl fmt::Display for TenantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.workspace_id)
    }
}

// =============================================================================
// CLUSTER B: TOPOLOGY
// =============================================================================

/// Topology selector for a request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Everything runs against a local store.
    Dev,
    /// Fully server-hosted store.
    #[default]
    Normal,
    /// Content stays in the browser; only bitmaps reach the server.
    Privacy,
}

impl OperatingMode {
    /// All modes, in policy-table order.
    pub const ALL: [OperatingMode; 3] = [Self::Dev, Self::Normal, Self::Privacy];

    /// Parse a configuration value, falling back to `Normal` for anything
    /// unrecognised.
    pub fn from_config_value(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Normal => "normal",
            Self::Privacy => "privacy",
        }
    }
}

impl FromStr for OperatingMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "normal" => Ok(Self::Normal),
            "privacy" => Ok(Self::Privacy),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier a connection handle talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// In-browser content store (no network).
    Browser,
    /// Server-hosted store.
    Server,
    /// Local development store.
    Local,
}

impl ConnectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Server => "server",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CLUSTER C: SERVER TIER (OPAQUE)
// =============================================================================

/// Obfuscated card: identifiers and fingerprints only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBitmapRecord {
    pub card_id: String,
    pub tenant_key: TenantKey,
    pub card_bitmap: Bitmap,
    pub tag_bitmaps: BTreeSet<Bitmap>,
    /// Integrity checksum; detects drift, cannot be reversed to content.
    pub checksum: String,
}

impl CardBitmapRecord {
    /// Whether the card carries the given tag fingerprint.
    pub fn has_tag(&self, bitmap: Bitmap) -> bool {
        self.tag_bitmaps.contains(&bitmap)
    }

    /// Whether the record belongs to `tenant`.
    pub fn belongs_to(&self, tenant: &TenantKey) -> bool {
        &self.tenant_key == tenant
    }
}

/// Obfuscated tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagBitmapRecord {
    pub tag_id: String,
    pub tenant_key: TenantKey,
    pub tag_bitmap: Bitmap,
    pub checksum: String,
    pub card_count: u64,
}

impl TagBitmapRecord {
    pub fn belongs_to(&self, tenant: &TenantKey) -> bool {
        &self.tenant_key == tenant
    }
}

// =============================================================================
// CLUSTER D: CONTENT TIER
// =============================================================================

/// A card as held by the content tier (browser, local or server store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContent {
    pub card_id: String,
    pub tenant_key: TenantKey,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tag_ids: Vec<String>,
}

/// A tag as held by the content tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagContent {
    pub tag_id: String,
    pub tenant_key: TenantKey,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}
