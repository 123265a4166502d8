use std::sync::Arc;

use crate::application::engagement::EngagementService;
use crate::application::feed::FeedService;
use crate::application::identity::{IdentityProvider, TokenIdentityService};
use crate::application::posts::PostService;
use crate::application::repos::StorageHealth;

#[derive(Clone)]
pub struct ApiState {
    pub feed: Arc<FeedService>,
    pub posts: Arc<PostService>,
    pub engagement: Arc<EngagementService>,
    /// Resolves bearer tokens for every request.
    pub identity: Arc<dyn IdentityProvider>,
    /// Registration, login and account lookups.
    pub accounts: Arc<TokenIdentityService>,
    pub storage: Arc<dyn StorageHealth>,
}
