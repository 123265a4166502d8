//! Post-commit hooks.
//!
//! Services dispatch a [`CommitEvent`] only after the store write returned
//! successfully. Hooks run in registration order and cannot fail the write.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{CommentRecord, PostRecord};
use crate::domain::reactions;
use crate::domain::types::{Privacy, Reaction};

#[derive(Debug, Clone, PartialEq)]
pub enum CommitEvent {
    PostCreated {
        post: PostRecord,
    },
    PostUpdated {
        post: PostRecord,
    },
    PostPrivacyChanged {
        post: PostRecord,
        previous: Privacy,
    },
    PostDeleted {
        post: PostRecord,
    },
    PostLiked {
        post_id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    },
    PostUnliked {
        post_id: Uuid,
        user_id: Uuid,
    },
    CommentAdded {
        comment: CommentRecord,
        post_author_id: Uuid,
    },
}

impl CommitEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CommitEvent::PostCreated { .. } => "post.created",
            CommitEvent::PostUpdated { .. } => "post.updated",
            CommitEvent::PostPrivacyChanged { .. } => "post.privacy_changed",
            CommitEvent::PostDeleted { .. } => "post.deleted",
            CommitEvent::PostLiked { .. } => "post.liked",
            CommitEvent::PostUnliked { .. } => "post.unliked",
            CommitEvent::CommentAdded { .. } => "comment.added",
        }
    }
}

#[async_trait]
pub trait CommitHook: Send + Sync {
    fn name(&self) -> &'static str;

    async fn on_commit(&self, event: &CommitEvent);
}

/// Ordered set of hooks shared by every write service.
#[derive(Clone, Default)]
pub struct CommitHooks {
    hooks: Vec<Arc<dyn CommitHook>>,
}

impl CommitHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hook: Arc<dyn CommitHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub async fn dispatch(&self, event: CommitEvent) {
        for hook in &self.hooks {
            tracing::debug!(hook = hook.name(), event = event.name(), "dispatching commit hook");
            hook.on_commit(&event).await;
        }
    }
}

/// Tells post authors about engagement from other users.
///
/// Delivery is a structured log event on the `agora::notify` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct EngagementNotifier;

#[async_trait]
impl CommitHook for EngagementNotifier {
    fn name(&self) -> &'static str {
        "engagement_notifier"
    }

    async fn on_commit(&self, event: &CommitEvent) {
        match event {
            CommitEvent::CommentAdded {
                comment,
                post_author_id,
            } if comment.user_id != *post_author_id => {
                info!(
                    target = "agora::notify",
                    recipient = %post_author_id,
                    actor = %comment.user_id,
                    post_id = %comment.post_id,
                    comment_id = %comment.id,
                    "new comment on your post"
                );
            }
            CommitEvent::PostLiked {
                post_id,
                user_id,
                reaction,
            } => {
                info!(
                    target = "agora::notify",
                    actor = %user_id,
                    post_id = %post_id,
                    reaction = reaction.as_str(),
                    "someone {} a post",
                    reactions::verb(*reaction)
                );
            }
            _ => {}
        }
    }
}
