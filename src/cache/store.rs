//! Feed page storage with LRU eviction and TTL expiry.

use std::num::NonZeroUsize;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use lru::LruCache;
use metrics::counter;

use crate::application::pagination::FeedPage;
use crate::domain::entities::FeedItem;

use super::keys::FeedKey;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

pub const METRIC_HIT: &str = "agora_feed_cache_hit_total";
pub const METRIC_MISS: &str = "agora_feed_cache_miss_total";
pub const METRIC_EVICT: &str = "agora_feed_cache_evict_total";
pub const METRIC_EXPIRED: &str = "agora_feed_cache_expired_total";

pub type CachedFeedPage = FeedPage<FeedItem>;

struct Entry {
    page: CachedFeedPage,
    stored_at: Instant,
}

/// In-memory feed page store.
///
/// Reads take the write lock because an LRU lookup reorders entries.
pub struct FeedStore {
    entries: RwLock<LruCache<FeedKey, Entry>>,
    ttl: Duration,
}

impl FeedStore {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Returns a fresh page. Expired entries count as misses and stay in place
    /// until overwritten or purged.
    pub fn get(&self, key: &FeedKey) -> Option<CachedFeedPage> {
        let fresh = rw_write(&self.entries, SOURCE, "get")
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.page.clone());

        let metric = if fresh.is_some() { METRIC_HIT } else { METRIC_MISS };
        counter!(metric).increment(1);
        fresh
    }

    /// Stores a page, returning the key pushed out by LRU eviction if any.
    pub fn set(&self, key: FeedKey, page: CachedFeedPage) -> Option<FeedKey> {
        let entry = Entry {
            page,
            stored_at: Instant::now(),
        };
        let displaced = rw_write(&self.entries, SOURCE, "set").push(key, entry);
        match displaced {
            Some((evicted, _)) if evicted != key => {
                counter!(METRIC_EVICT).increment(1);
                Some(evicted)
            }
            _ => None,
        }
    }

    pub fn invalidate(&self, key: &FeedKey) -> bool {
        rw_write(&self.entries, SOURCE, "invalidate")
            .pop(key)
            .is_some()
    }

    /// Drops every expired entry and returns the removed keys.
    pub fn purge_expired(&self) -> Vec<FeedKey> {
        let mut entries = rw_write(&self.entries, SOURCE, "purge_expired");
        let expired: Vec<FeedKey> = entries
            .iter()
            .filter(|(_, entry)| entry.stored_at.elapsed() >= self.ttl)
            .map(|(key, _)| *key)
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        if !expired.is_empty() {
            counter!(METRIC_EXPIRED).increment(expired.len() as u64);
        }
        expired
    }

    pub fn contains(&self, key: &FeedKey) -> bool {
        rw_read(&self.entries, SOURCE, "contains").contains(key)
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
