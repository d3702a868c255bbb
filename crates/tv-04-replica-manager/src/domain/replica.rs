//! Replica handles and sync inputs/outputs.

use std::collections::HashMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use shared_types::{CardContent, TagContent, TenantKey};
use uuid::Uuid;

/// A provisioned per-tenant replica. Shared by every caller for the tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaHandle {
    pub id: Uuid,
    pub tenant: TenantKey,
    /// Backend-specific location (path, URL or in-memory name).
    pub location: String,
    pub created_at: SystemTime,
}

/// The browser tier's view of one tenant, sent for mirroring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserSnapshot {
    #[serde(default)]
    pub cards: Vec<CardContent>,
    #[serde(default)]
    pub tags: Vec<TagContent>,
    /// Tombstoned card ids.
    #[serde(default)]
    pub deleted_card_ids: Vec<String>,
    /// Tombstoned tag ids.
    #[serde(default)]
    pub deleted_tag_ids: Vec<String>,
}

impl BrowserSnapshot {
    pub fn record_count(&self) -> usize {
        self.cards.len() + self.tags.len() + self.deleted_card_ids.len() + self.deleted_tag_ids.len()
    }

    /// Number of snapshot cards carrying each tag id.
    pub fn card_counts(&self) -> HashMap<&str, u64> {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for card in &self.cards {
            for tag_id in &card.tag_ids {
                *counts.entry(tag_id.as_str()).or_default() += 1;
            }
        }
        counts
    }
}

/// Outcome of `sync_browser_to_server`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub tenant: TenantKey,
    pub cards_written: usize,
    pub tags_written: usize,
    pub cards_deleted: usize,
    pub tags_deleted: usize,
    /// Version recorded in `sync_metadata`; 0 if the sync did not finish.
    pub sync_version: u64,
    /// Bitmaps were forwarded to the server bitmap sink.
    pub forwarded: bool,
    /// Stopped at a record boundary by the cancellation signal.
    pub cancelled: bool,
    /// A connectivity error or timeout deferred the work to the retry queue.
    pub queued_for_retry: bool,
    pub retry_job: Option<Uuid>,
}

impl SyncSummary {
    pub fn new(tenant: TenantKey) -> Self {
        Self {
            tenant,
            cards_written: 0,
            tags_written: 0,
            cards_deleted: 0,
            tags_deleted: 0,
            sync_version: 0,
            forwarded: false,
            cancelled: false,
            queued_for_retry: false,
            retry_job: None,
        }
    }

    pub fn queued(tenant: TenantKey, job: Uuid) -> Self {
        Self {
            queued_for_retry: true,
            retry_job: Some(job),
            ..Self::new(tenant)
        }
    }
}
