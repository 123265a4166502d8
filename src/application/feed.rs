//! Paginated, privacy-aware feed assembly backed by the feed cache.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::application::error::ServiceError;
use crate::application::pagination::{FeedPage, PageLimits, PageRequest};
use crate::application::repos::{FeedQuery, PostsRepo};
use crate::cache::{EntityKey, FeedCache, FeedKey, FeedScope};
use crate::domain::entities::FeedItem;
use crate::domain::visibility::Viewer;

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
    cache: Arc<FeedCache>,
    limits: PageLimits,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostsRepo>, cache: Arc<FeedCache>, limits: PageLimits) -> Self {
        Self {
            posts,
            cache,
            limits,
        }
    }

    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    /// Posts visible to `viewer`, newest first.
    ///
    /// `page` is zero-based; a page past the end is empty rather than an error.
    pub async fn get_feed(
        &self,
        viewer: &Viewer,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<FeedPage<FeedItem>, ServiceError> {
        let request = PageRequest::resolve(page, page_size, self.limits)?;
        let scope = self.resolve_scope(viewer).await?;
        let key = FeedKey::new(scope, request);

        if let Some(cached) = self.cache.get(&key) {
            debug!(target = "agora::feed", scope = ?scope, page = request.page, "feed cache hit");
            return Ok(cached);
        }

        let viewer_id = scope.viewer_id();
        let total_count = self.posts.count_feed(viewer_id).await?;
        let items = if request.offset() >= total_count {
            Vec::new()
        } else {
            self.posts
                .list_feed(FeedQuery {
                    viewer_id,
                    offset: request.offset(),
                    limit: request.page_size,
                })
                .await?
        };

        let page = FeedPage::new(items, request, total_count);
        self.cache.set(key, page.clone(), dependencies(scope, &page));
        Ok(page)
    }

    /// Viewers without private posts share the public scope.
    pub async fn resolve_scope(&self, viewer: &Viewer) -> Result<FeedScope, ServiceError> {
        match viewer.user_id() {
            None => Ok(FeedScope::Public),
            Some(id) if self.posts.has_private_posts(id).await? => Ok(FeedScope::Viewer(id)),
            Some(_) => Ok(FeedScope::Public),
        }
    }
}

fn dependencies(scope: FeedScope, page: &FeedPage<FeedItem>) -> HashSet<EntityKey> {
    let mut entities = HashSet::with_capacity(page.items.len() + 2);
    entities.insert(EntityKey::PublicTimeline);
    entities.insert(EntityKey::Scope(scope));
    entities.extend(page.items.iter().map(|item| EntityKey::Post(item.post.id)));
    entities
}
