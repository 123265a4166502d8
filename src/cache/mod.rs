//! Agora feed cache.
//!
//! Feed pages are cached in-process under `(scope, page, page_size)`. Every
//! page is registered against the entities it was built from; each committed
//! write is turned into targeted invalidations before the write returns.
//!
//! ```toml
//! [cache]
//! enabled = true
//! ttl_seconds = 300
//! capacity = 1000
//! sweep_interval_seconds = 60
//! ```

mod config;
mod consumer;
mod events;
mod feed_cache;
mod keys;
mod lock;
mod planner;
mod registry;
mod store;
mod trigger;

pub use config::CacheConfig;
pub use consumer::CacheConsumer;
pub use events::EventKind;
pub use feed_cache::FeedCache;
pub use keys::{EntityKey, FeedKey, FeedScope};
pub use planner::{ConsumptionPlan, entities_for};
pub use registry::CacheRegistry;
pub use store::{CachedFeedPage, FeedStore};
pub use trigger::CacheTrigger;

/// Metric names emitted by the cache.
pub mod metric_names {
    pub use super::feed_cache::METRIC_INVALIDATED as INVALIDATED;
    pub use super::store::{
        METRIC_EVICT as EVICT, METRIC_EXPIRED as EXPIRED, METRIC_HIT as HIT, METRIC_MISS as MISS,
    };
    pub use super::consumer::METRIC_CACHE_CONSUME_MS as CONSUME_MS;
}
