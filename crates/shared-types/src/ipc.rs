//! # Wire Outcome Records
//!
//! Shapes returned across the trust boundary. Services return typed
//! `Result`s; handlers convert them into these records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{CardContent, ConnectionType};
use crate::errors::{Categorized, ErrorKind};

/// Bitmap filter operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterKind {
    Match,
    And,
    Or,
    Not,
    Complex,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "MATCH",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Complex => "COMPLEX",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a bitmap filter.
///
/// Identifiers, counts and operation tags only. There is no
/// field that could carry a title, description or tag name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterResult {
    #[serde(rename = "cardIds")]
    pub matched_card_ids: Vec<String>,
    #[serde(rename = "totalMatches")]
    pub total_matches: usize,
    pub operation: FilterKind,
    pub method: String,
}

impl FilterResult {
    pub fn new(matched_card_ids: Vec<String>, operation: FilterKind, method: &str) -> Self {
        Self {
            total_matches: matched_card_ids.len(),
            matched_card_ids,
            operation,
            method: method.to_string(),
        }
    }
}

/// Outcome of a sync call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub success: bool,
    pub identifiers: Vec<String>,
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl SyncResult {
    pub fn ok(identifiers: Vec<String>) -> Self {
        Self {
            success: true,
            identifiers,
            error_message: None,
            error_kind: None,
        }
    }

    pub fn failure<E: Categorized + fmt::Display>(error: &E) -> Self {
        Self {
            success: false,
            identifiers: Vec::new(),
            error_message: Some(error.to_string()),
            error_kind: Some(error.kind()),
        }
    }
}

/// Outcome of a routed query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub success: bool,
    /// Tier that served the query, if one was reached.
    pub tier: Option<ConnectionType>,
    pub identifiers: Vec<String>,
    /// Resolved content records; empty for bitmap-only operations.
    #[serde(default)]
    pub records: Vec<CardContent>,
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl QueryResult {
    /// Identifier-only result.
    pub fn with_identifiers(tier: ConnectionType, identifiers: Vec<String>) -> Self {
        Self {
            success: true,
            tier: Some(tier),
            identifiers,
            records: Vec::new(),
            error_message: None,
            error_kind: None,
        }
    }

    /// Content result; identifiers are derived from the records.
    pub fn with_records(tier: ConnectionType, records: Vec<CardContent>) -> Self {
        Self {
            success: true,
            tier: Some(tier),
            identifiers: records.iter().map(|r| r.card_id.clone()).collect(),
            records,
            error_message: None,
            error_kind: None,
        }
    }

    pub fn failure<E: Categorized + fmt::Display>(error: &E) -> Self {
        Self {
            success: false,
            tier: None,
            identifiers: Vec::new(),
            records: Vec::new(),
            error_message: Some(error.to_string()),
            error_kind: Some(error.kind()),
        }
    }
}
