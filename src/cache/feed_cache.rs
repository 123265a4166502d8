//! Feed cache facade pairing the page store with the dependency registry.

use std::collections::HashSet;

use metrics::counter;
use tracing::debug;

use super::config::CacheConfig;
use super::keys::{EntityKey, FeedKey};
use super::registry::CacheRegistry;
use super::store::{CachedFeedPage, FeedStore};

pub const METRIC_INVALIDATED: &str = "agora_feed_cache_invalidated_total";

pub struct FeedCache {
    config: CacheConfig,
    store: FeedStore,
    registry: CacheRegistry,
}

impl FeedCache {
    pub fn new(config: CacheConfig) -> Self {
        let store = FeedStore::new(config.capacity_non_zero(), config.ttl());
        Self {
            config,
            store,
            registry: CacheRegistry::new(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    pub fn get(&self, key: &FeedKey) -> Option<CachedFeedPage> {
        if !self.is_enabled() {
            return None;
        }
        self.store.get(key)
    }

    /// Stores a page and records what it depends on.
    pub fn set(&self, key: FeedKey, page: CachedFeedPage, dependencies: HashSet<EntityKey>) {
        if !self.is_enabled() {
            return;
        }
        self.registry.register(key, dependencies);
        if let Some(evicted) = self.store.set(key, page) {
            self.registry.unregister(&evicted);
        }
    }

    /// Drops every page depending on `entity`; returns how many were dropped.
    pub fn invalidate(&self, entity: &EntityKey) -> usize {
        let keys = self.registry.take_entity(entity);
        let mut removed = 0;
        for key in &keys {
            if self.store.invalidate(key) {
                removed += 1;
            }
        }
        if !keys.is_empty() {
            counter!(METRIC_INVALIDATED).increment(keys.len() as u64);
            debug!(entity = ?entity, keys = keys.len(), removed, "feed cache entity invalidated");
        }
        removed
    }

    /// Purges expired pages and their registry entries.
    pub fn sweep_expired(&self) -> usize {
        let expired = self.store.purge_expired();
        for key in &expired {
            self.registry.unregister(key);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn contains(&self, key: &FeedKey) -> bool {
        self.store.contains(key)
    }
}

#[cfg(test)]
impl FeedCache {
    pub(crate) fn registry(&self) -> &CacheRegistry {
        &self.registry
    }
}
