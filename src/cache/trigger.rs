//! Cache trigger service.
//!
//! Turns committed writes into invalidations. Each write's invalidation has
//! finished by the time its commit hook returns.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::application::hooks::{CommitEvent, CommitHook};
use crate::domain::types::Privacy;

use super::consumer::CacheConsumer;
use super::events::EventKind;
use super::feed_cache::FeedCache;

pub struct CacheTrigger {
    cache: Arc<FeedCache>,
    consumer: CacheConsumer,
}

impl CacheTrigger {
    pub fn new(cache: Arc<FeedCache>) -> Self {
        let consumer = CacheConsumer::new(cache.clone());
        Self { cache, consumer }
    }

    /// Invalidates the pages `kind` made stale. Returns how many were removed.
    pub fn trigger(&self, kind: EventKind) -> usize {
        if !self.cache.is_enabled() {
            debug!(event_kind = ?kind, "Cache trigger skipped: cache disabled");
            return 0;
        }
        self.consumer.apply(&kind)
    }

    pub fn post_created(&self, post_id: Uuid, author_id: Uuid, privacy: Privacy) {
        self.trigger(EventKind::PostCreated {
            post_id,
            author_id,
            privacy,
        });
    }

    pub fn post_updated(&self, post_id: Uuid) {
        self.trigger(EventKind::PostUpdated { post_id });
    }

    pub fn privacy_changed(&self, post_id: Uuid, author_id: Uuid) {
        self.trigger(EventKind::PostPrivacyChanged { post_id, author_id });
    }

    pub fn post_deleted(&self, post_id: Uuid, author_id: Uuid, privacy: Privacy) {
        self.trigger(EventKind::PostDeleted {
            post_id,
            author_id,
            privacy,
        });
    }

    pub fn engagement_changed(&self, post_id: Uuid) {
        self.trigger(EventKind::EngagementChanged { post_id });
    }
}

#[async_trait]
impl CommitHook for CacheTrigger {
    fn name(&self) -> &'static str {
        "feed_cache"
    }

    async fn on_commit(&self, event: &CommitEvent) {
        match event {
            CommitEvent::PostCreated { post } => {
                self.post_created(post.id, post.author_id, post.privacy)
            }
            CommitEvent::PostUpdated { post } => self.post_updated(post.id),
            CommitEvent::PostPrivacyChanged { post, .. } => {
                self.privacy_changed(post.id, post.author_id)
            }
            CommitEvent::PostDeleted { post } => {
                self.post_deleted(post.id, post.author_id, post.privacy)
            }
            CommitEvent::PostLiked { post_id, .. } | CommitEvent::PostUnliked { post_id, .. } => {
                self.engagement_changed(*post_id)
            }
            CommitEvent::CommentAdded { comment, .. } => self.engagement_changed(comment.post_id),
        }
    }
}
