//! Cache key definitions.
//!
//! `FeedKey` names a cached feed page; `EntityKey` names something a cached
//! page depends on.

use uuid::Uuid;

use crate::application::pagination::PageRequest;

/// Which population of posts a feed page was assembled from.
///
/// Authenticated viewers without private posts see exactly the public feed and
/// share its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedScope {
    Public,
    Viewer(Uuid),
}

impl FeedScope {
    /// Store filter matching this scope.
    pub fn viewer_id(&self) -> Option<Uuid> {
        match self {
            FeedScope::Public => None,
            FeedScope::Viewer(id) => Some(*id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedKey {
    pub scope: FeedScope,
    pub page: u32,
    pub page_size: u32,
}

impl FeedKey {
    pub fn new(scope: FeedScope, request: PageRequest) -> Self {
        Self {
            scope,
            page: request.page,
            page_size: request.page_size,
        }
    }
}

/// Identifies a domain entity or derived collection for cache invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    /// The set of public posts; every feed page includes it.
    PublicTimeline,
    /// Every page cached under one scope.
    Scope(FeedScope),
    /// A post shown on a cached page.
    Post(Uuid),
}
