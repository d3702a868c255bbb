//! In-memory content tier.
//!
//! Stands in for the browser store, the server store or the local store.
//! Given a fingerprint secret it can also evaluate bitmap filters over its
//! own cards, the way the server and local stores do in one round trip.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_crypto::ObfuscationKey;
use shared_types::{CardBitmapRecord, CardContent, ConnectionType, TenantKey};
use tv_02_bitmap_filter::{BitmapFilterApi, BitmapFilterEngine, FilterRequest};
use tv_04_replica_manager::domain::obfuscation;
use zeroize::Zeroizing;

use crate::error::TierError;
use crate::ports::ContentTier;

pub struct InMemoryContentTier {
    connection_type: ConnectionType,
    cards: RwLock<BTreeMap<(TenantKey, String), CardContent>>,
    fingerprint_secret: Option<Zeroizing<Vec<u8>>>,
    engine: BitmapFilterEngine,
    offline: AtomicBool,
    latency: Mutex<Duration>,
}

impl InMemoryContentTier {
    pub fn new(connection_type: ConnectionType) -> Self {
        Self {
            connection_type,
            cards: RwLock::new(BTreeMap::new()),
            fingerprint_secret: None,
            engine: BitmapFilterEngine::new(),
            offline: AtomicBool::new(false),
            latency: Mutex::new(Duration::ZERO),
        }
    }

    /// Enable `filter_content`, fingerprinting cards with `secret`.
    pub fn with_fingerprint_secret(mut self, secret: &[u8]) -> Self {
        self.fingerprint_secret = Some(Zeroizing::new(secret.to_vec()));
        self
    }

    pub fn insert(&self, card: CardContent) {
        let key = (card.tenant_key.clone(), card.card_id.clone());
        self.cards.write().insert(key, card);
    }

    pub fn remove(&self, tenant: &TenantKey, card_id: &str) -> bool {
        self.cards
            .write()
            .remove(&(tenant.clone(), card_id.to_string()))
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.cards.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.read().is_empty()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Delay applied to every call.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = latency;
    }

    async fn enter(&self) -> Result<(), TierError> {
        let latency = *self.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(TierError::Unavailable(format!(
                "{} store offline",
                self.connection_type
            )));
        }
        Ok(())
    }

    fn tenant_cards(&self, tenant: &TenantKey) -> Vec<CardContent> {
        self.cards
            .read()
            .iter()
            .filter(|((owner, _), _)| owner == tenant)
            .map(|(_, card)| card.clone())
            .collect()
    }
}

#[async_trait]
impl ContentTier for InMemoryContentTier {
    fn connection_type(&self) -> ConnectionType {
        self.connection_type
    }

    async fn resolve_content_by_ids(
        &self,
        tenant: &TenantKey,
        ids: &[String],
    ) -> Result<Vec<CardContent>, TierError> {
        self.enter().await?;
        let cards = self.cards.read();
        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| cards.get(&(tenant.clone(), id.clone())).cloned())
            .collect())
    }

    async fn read_local_content(&self, tenant: &TenantKey) -> Result<Vec<CardContent>, TierError> {
        self.enter().await?;
        Ok(self.tenant_cards(tenant))
    }

    async fn filter_content(
        &self,
        tenant: &TenantKey,
        operations: &[FilterRequest],
    ) -> Result<Vec<CardContent>, TierError> {
        self.enter().await?;
        let secret = self
            .fingerprint_secret
            .as_ref()
            .ok_or(TierError::Unsupported("filter_content"))?;
        let key = ObfuscationKey::derive(secret, &tenant.user_id, &tenant.workspace_id);

        let cards = self.tenant_cards(tenant);
        let records: Vec<CardBitmapRecord> = cards
            .iter()
            .map(|card| obfuscation::obfuscate_card(&key, card))
            .collect();

        let mut matched: Option<HashSet<String>> = None;
        for operation in operations {
            let ids: HashSet<String> = self
                .engine
                .filter(operation, tenant, &records)?
                .matched_card_ids
                .into_iter()
                .collect();
            matched = Some(match matched {
                Some(previous) => previous.intersection(&ids).cloned().collect(),
                None => ids,
            });
        }

        let matched = matched.unwrap_or_default();
        Ok(cards
            .into_iter()
            .filter(|card| matched.contains(&card.card_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"tier-secret";

    fn card(id: &str, user: &str, tags: &[&str]) -> CardContent {
        CardContent {
            card_id: id.into(),
            tenant_key: TenantKey::new(user, "w1"),
            title: format!("title {id}"),
            description: String::new(),
            content: String::new(),
            tag_ids: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn tag_bitmap(tenant: &TenantKey, tag_id: &str) -> u64 {
        let key = ObfuscationKey::derive(SECRET, &tenant.user_id, &tenant.workspace_id);
        obfuscation::tag_bitmap(&key, tag_id)
    }

    #[tokio::test]
    async fn test_resolve_by_ids_is_tenant_scoped() {
        let tier = InMemoryContentTier::new(ConnectionType::Browser);
        tier.insert(card("c1", "u1", &[]));
        tier.insert(card("c2", "u2", &[]));
        let u1 = TenantKey::new("u1", "w1");

        let found = tier
            .resolve_content_by_ids(&u1, &["c2".into(), "c1".into(), "c1".into(), "c9".into()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].card_id, "c1");
        assert_eq!(tier.read_local_content(&u1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_filter_content_intersects_operations() {
        let tier = InMemoryContentTier::new(ConnectionType::Server).with_fingerprint_secret(SECRET);
        let u1 = TenantKey::new("u1", "w1");
        tier.insert(card("c1", "u1", &["t1", "t2"]));
        tier.insert(card("c2", "u1", &["t2", "t3"]));
        tier.insert(card("c3", "u1", &["t1", "t3"]));
        tier.insert(card("x1", "u2", &["t1", "t2"]));

        let ops = [
            FilterRequest::Match { bitmap: tag_bitmap(&u1, "t1") },
            FilterRequest::Match { bitmap: tag_bitmap(&u1, "t2") },
        ];
        let found = tier.filter_content(&u1, &ops).await.unwrap();
        let ids: Vec<_> = found.iter().map(|c| c.card_id.as_str()).collect();
        assert_eq!(ids, vec!["c1"]);
    }

    #[tokio::test]
    async fn test_filter_content_needs_secret() {
        let tier = InMemoryContentTier::new(ConnectionType::Browser);
        let err = tier
            .filter_content(&TenantKey::new("u1", "w1"), &[FilterRequest::Match { bitmap: 1 }])
            .await
            .unwrap_err();
        assert_eq!(err, TierError::Unsupported("filter_content"));
    }

    #[tokio::test]
    async fn test_offline_tier() {
        let tier = InMemoryContentTier::new(ConnectionType::Server);
        tier.set_offline(true);
        assert!(matches!(
            tier.read_local_content(&TenantKey::new("u1", "w1")).await,
            Err(TierError::Unavailable(_))
        ));
    }
}
