//! Applies invalidation plans to the feed cache.

use std::sync::Arc;
use std::time::Instant;

use metrics::histogram;
use tracing::{info, instrument};

use super::events::EventKind;
use super::feed_cache::FeedCache;
use super::planner::ConsumptionPlan;

pub const METRIC_CACHE_CONSUME_MS: &str = "agora_cache_consume_ms";

/// Turns one committed change into targeted invalidations.
pub struct CacheConsumer {
    cache: Arc<FeedCache>,
}

impl CacheConsumer {
    pub fn new(cache: Arc<FeedCache>) -> Self {
        Self { cache }
    }

    /// Invalidates every page the change made stale before returning.
    ///
    /// Returns the number of cached pages removed.
    #[instrument(skip(self), fields(post_id = %kind.post_id()))]
    pub fn apply(&self, kind: &EventKind) -> usize {
        let started_at = Instant::now();
        let plan = ConsumptionPlan::for_event(kind);

        let mut removed = 0;
        for entity in &plan.invalidate_entities {
            removed += self.cache.invalidate(entity);
        }

        info!(
            event_kind = ?kind,
            plan = %plan,
            removed,
            "Cache invalidation applied"
        );
        histogram!(METRIC_CACHE_CONSUME_MS)
            .record(started_at.elapsed().as_secs_f64() * 1000.0);
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use uuid::Uuid;

    use super::*;
    use crate::application::pagination::{FeedPage, PageRequest};
    use crate::cache::config::CacheConfig;
    use crate::cache::keys::{EntityKey, FeedKey, FeedScope};
    use crate::domain::types::Privacy;

    fn cached_page(cache: &FeedCache, scope: FeedScope, entities: HashSet<EntityKey>) -> FeedKey {
        let key = FeedKey {
            scope,
            page: 0,
            page_size: 10,
        };
        cache.set(
            key,
            FeedPage::new(Vec::new(), PageRequest { page: 0, page_size: 10 }, 0),
            entities,
        );
        key
    }

    #[test]
    fn apply_removes_only_the_pages_the_change_touches() {
        let cache = Arc::new(FeedCache::new(CacheConfig::default()));
        let consumer = CacheConsumer::new(cache.clone());
        let author = Uuid::new_v4();

        let public = cached_page(
            &cache,
            FeedScope::Public,
            HashSet::from([EntityKey::PublicTimeline, EntityKey::Scope(FeedScope::Public)]),
        );
        let own = cached_page(
            &cache,
            FeedScope::Viewer(author),
            HashSet::from([EntityKey::Scope(FeedScope::Viewer(author))]),
        );

        let removed = consumer.apply(&EventKind::PostCreated {
            post_id: Uuid::new_v4(),
            author_id: author,
            privacy: Privacy::Private,
        });

        assert_eq!(removed, 1);
        assert!(cache.contains(&public));
        assert!(!cache.contains(&own));

        assert_eq!(
            consumer.apply(&EventKind::PostCreated {
                post_id: Uuid::new_v4(),
                author_id: author,
                privacy: Privacy::Public,
            }),
            1
        );
        assert!(cache.is_empty());
    }
}
