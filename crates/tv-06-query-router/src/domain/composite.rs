//! Output of a filtered query.

use shared_types::{CardContent, ConnectionType, OperatingMode, QueryResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeResult {
    pub mode: OperatingMode,
    /// Tier the content came from.
    pub content_tier: ConnectionType,
    /// Ids produced by the bitmap phase (privacy) or by the tier itself.
    pub matched_card_ids: Vec<String>,
    pub records: Vec<CardContent>,
    /// Tier round trips made: 2 in privacy mode, 1 otherwise.
    pub round_trips: u8,
}

impl CompositeResult {
    pub fn total_matches(&self) -> usize {
        self.matched_card_ids.len()
    }
}

impl From<CompositeResult> for QueryResult {
    fn from(result: CompositeResult) -> Self {
        let mut query = QueryResult::with_records(result.content_tier, result.records);
        query.identifiers = result.matched_card_ids;
        query
    }
}
