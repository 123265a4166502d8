//! Bidirectional cache registry.
//!
//! Tracks which feed pages depend on which entities so a mutation can drop
//! exactly the affected pages.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use super::keys::{EntityKey, FeedKey};
use super::lock::rw_write;

const SOURCE: &str = "cache::registry";

#[derive(Default)]
struct Maps {
    entity_to_keys: HashMap<EntityKey, HashSet<FeedKey>>,
    key_to_entities: HashMap<FeedKey, HashSet<EntityKey>>,
}

/// Tracks entity → feed keys and feed key → entities mappings.
///
/// Both directions live under one lock so they never disagree.
#[derive(Default)]
pub struct CacheRegistry {
    maps: RwLock<Maps>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feed page with its dependencies, replacing any previous
    /// registration of the same key.
    pub fn register(&self, key: FeedKey, entities: HashSet<EntityKey>) {
        let mut maps = rw_write(&self.maps, SOURCE, "register");
        detach(&mut maps, &key);
        for entity in &entities {
            maps.entity_to_keys.entry(*entity).or_default().insert(key);
        }
        maps.key_to_entities.insert(key, entities);
    }

    /// Remove a feed key and clean up its entity mappings.
    pub fn unregister(&self, key: &FeedKey) {
        let mut maps = rw_write(&self.maps, SOURCE, "unregister");
        detach(&mut maps, key);
    }

    /// Remove every feed key that depends on `entity`, returning them.
    ///
    /// The returned keys are fully unregistered, including their mappings to
    /// other entities.
    pub fn take_entity(&self, entity: &EntityKey) -> HashSet<FeedKey> {
        let mut maps = rw_write(&self.maps, SOURCE, "take_entity");
        let affected = maps.entity_to_keys.remove(entity).unwrap_or_default();
        for key in &affected {
            detach(&mut maps, key);
        }
        affected
    }
}

#[cfg(test)]
impl CacheRegistry {
    /// Get all feed keys affected by an entity change.
    pub fn keys_for_entity(&self, entity: &EntityKey) -> HashSet<FeedKey> {
        super::lock::rw_read(&self.maps, SOURCE, "keys_for_entity")
            .entity_to_keys
            .get(entity)
            .cloned()
            .unwrap_or_default()
    }

    /// Get all entities that a feed key depends on.
    pub fn entities_for_key(&self, key: &FeedKey) -> HashSet<EntityKey> {
        super::lock::rw_read(&self.maps, SOURCE, "entities_for_key")
            .key_to_entities
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of tracked entities.
    pub fn entity_count(&self) -> usize {
        super::lock::rw_read(&self.maps, SOURCE, "entity_count").entity_to_keys.len()
    }

    /// Number of tracked feed keys.
    pub fn key_count(&self) -> usize {
        super::lock::rw_read(&self.maps, SOURCE, "key_count").key_to_entities.len()
    }
}

fn detach(maps: &mut Maps, key: &FeedKey) {
    let Some(entities) = maps.key_to_entities.remove(key) else {
        return;
    };
    for entity in entities {
        if let Some(keys) = maps.entity_to_keys.get_mut(&entity) {
            keys.remove(key);
            if keys.is_empty() {
                maps.entity_to_keys.remove(&entity);
            }
        }
    }
}
