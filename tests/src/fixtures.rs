//! Shared test fixtures.

use std::time::Duration;

use shared_crypto::ObfuscationKey;
use shared_types::{Bitmap, CardContent, OperatingMode, TagContent, TenantKey};
use tagvault_runtime::{RuntimeConfig, ServiceContainer};
use tv_04_replica_manager::domain::obfuscation;
use tv_04_replica_manager::{BrowserSnapshot, ReplicaManagerApi, SyncSummary};

/// Hex server secret used by every fixture container.
pub fn server_secret_hex() -> String {
    "5a".repeat(32)
}

pub fn tenant(user: &str) -> TenantKey {
    TenantKey::new(user, "w1")
}

pub fn card(tenant: &TenantKey, id: &str, tags: &[&str]) -> CardContent {
    CardContent {
        card_id: id.into(),
        tenant_key: tenant.clone(),
        title: format!("Private title of {id}"),
        description: format!("Private description of {id}"),
        content: format!("Private body of {id}"),
        tag_ids: tags.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn tag(tenant: &TenantKey, id: &str) -> TagContent {
    TagContent {
        tag_id: id.into(),
        tenant_key: tenant.clone(),
        name: format!("Private tag {id}"),
        color: Some("#ff0000".into()),
    }
}

/// c1 {t1, t2}, c2 {t2, t3}, c3 {t1, t3}
pub fn scenario_cards(tenant: &TenantKey) -> Vec<CardContent> {
    vec![
        card(tenant, "c1", &["t1", "t2"]),
        card(tenant, "c2", &["t2", "t3"]),
        card(tenant, "c3", &["t1", "t3"]),
    ]
}

pub fn config(mode: OperatingMode) -> RuntimeConfig {
    let secret = server_secret_hex();
    let mut config = RuntimeConfig::from_lookup(|name| match name {
        "TV_MODE" => Some(mode.as_str().to_string()),
        "TV_SERVER_SECRET" => Some(secret.clone()),
        _ => None,
    })
    .unwrap();
    config.replica.retry.initial_delay = Duration::from_millis(10);
    config.replica.retry.max_delay = Duration::from_millis(50);
    config.query.timeout = Duration::from_millis(500);
    config
}

pub fn container(mode: OperatingMode) -> ServiceContainer {
    ServiceContainer::new(config(mode))
}

/// Fingerprint of `tag_id` as the server sees it.
pub fn tag_bitmap(container: &ServiceContainer, tenant: &TenantKey, tag_id: &str) -> Bitmap {
    let key = ObfuscationKey::derive(
        container.config.server_secret.as_slice(),
        &tenant.user_id,
        &tenant.workspace_id,
    );
    obfuscation::tag_bitmap(&key, tag_id)
}

/// Put `cards` in the browser store and mirror them to the server tier.
pub async fn sync_browser_cards(
    container: &ServiceContainer,
    tenant: &TenantKey,
    cards: Vec<CardContent>,
) -> SyncSummary {
    for card in &cards {
        container.browser_content.insert(card.clone());
    }
    let tags = unique_tags(tenant, &cards);
    container
        .replicas
        .sync_browser_to_server(
            tenant,
            BrowserSnapshot {
                cards,
                tags,
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

fn unique_tags(tenant: &TenantKey, cards: &[CardContent]) -> Vec<TagContent> {
    let mut ids: Vec<&str> = cards
        .iter()
        .flat_map(|c| c.tag_ids.iter().map(String::as_str))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids.into_iter().map(|id| tag(tenant, id)).collect()
}
