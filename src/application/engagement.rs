//! Likes and comments.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::application::error::ServiceError;
use crate::application::hooks::{CommitEvent, CommitHooks};
use crate::application::posts::PostPolicy;
use crate::application::repos::{
    CreateCommentParams, EngagementRepo, LikeParams, PostsRepo, RepoError,
};
use crate::domain::entities::{CommentRecord, PostRecord};
use crate::domain::posts::validate_comment;
use crate::domain::reactions;
use crate::domain::types::Reaction;
use crate::domain::visibility::{Viewer, is_visible};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    pub post_id: Uuid,
    /// `false` when the like already existed.
    pub created: bool,
    /// Reaction stored on the like row.
    pub reaction: Reaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlikeOutcome {
    pub post_id: Uuid,
    pub removed: bool,
}

#[derive(Clone)]
pub struct EngagementService {
    posts: Arc<dyn PostsRepo>,
    engagement: Arc<dyn EngagementRepo>,
    hooks: CommitHooks,
    policy: PostPolicy,
}

impl EngagementService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        engagement: Arc<dyn EngagementRepo>,
        hooks: CommitHooks,
        policy: PostPolicy,
    ) -> Self {
        Self {
            posts,
            engagement,
            hooks,
            policy,
        }
    }

    /// Idempotent: a second like reports `created = false` and keeps the
    /// original reaction.
    pub async fn like(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
        reaction: Reaction,
    ) -> Result<LikeOutcome, ServiceError> {
        let user_id = viewer.user_id().ok_or(ServiceError::Unauthenticated)?;
        self.visible_post(viewer, post_id).await?;

        let created = self
            .engagement
            .like(LikeParams {
                user_id,
                post_id,
                reaction,
            })
            .await
            .map_err(post_gone)?;

        if !created {
            let stored = self
                .engagement
                .find_like(user_id, post_id)
                .await?
                .map(|like| like.reaction)
                .unwrap_or(reaction);
            return Ok(LikeOutcome {
                post_id,
                created: false,
                reaction: stored,
            });
        }

        info!(
            target = "agora::engagement",
            post_id = %post_id,
            user_id = %user_id,
            reaction = reaction.as_str(),
            "post {}",
            reactions::verb(reaction)
        );
        self.hooks
            .dispatch(CommitEvent::PostLiked {
                post_id,
                user_id,
                reaction,
            })
            .await;

        Ok(LikeOutcome {
            post_id,
            created: true,
            reaction,
        })
    }

    /// Idempotent: unliking a post that is not liked removes nothing.
    pub async fn unlike(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
    ) -> Result<UnlikeOutcome, ServiceError> {
        let user_id = viewer.user_id().ok_or(ServiceError::Unauthenticated)?;
        self.visible_post(viewer, post_id).await?;

        let removed = self.engagement.unlike(user_id, post_id).await?;
        if removed {
            self.hooks
                .dispatch(CommitEvent::PostUnliked { post_id, user_id })
                .await;
        }
        Ok(UnlikeOutcome { post_id, removed })
    }

    pub async fn add_comment(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
        text: String,
    ) -> Result<CommentRecord, ServiceError> {
        let user_id = viewer.user_id().ok_or(ServiceError::Unauthenticated)?;
        let post = self.visible_post(viewer, post_id).await?;
        if !self.policy.allow_comments {
            return Err(ServiceError::PermissionDenied("comments are disabled"));
        }
        validate_comment(&text)?;

        let comment = self
            .engagement
            .add_comment(CreateCommentParams {
                user_id,
                post_id,
                text,
            })
            .await
            .map_err(post_gone)?;

        self.hooks
            .dispatch(CommitEvent::CommentAdded {
                comment: comment.clone(),
                post_author_id: post.author_id,
            })
            .await;
        Ok(comment)
    }

    pub async fn list_comments(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
    ) -> Result<Vec<CommentRecord>, ServiceError> {
        self.visible_post(viewer, post_id).await?;
        Ok(self.engagement.list_comments(post_id).await?)
    }

    async fn visible_post(&self, viewer: &Viewer, post_id: Uuid) -> Result<PostRecord, ServiceError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(ServiceError::NotFound("post"))?;
        if !is_visible(&post, viewer) {
            return Err(ServiceError::PermissionDenied("post is private"));
        }
        Ok(post)
    }
}

/// The post can vanish between the visibility check and the insert.
fn post_gone(err: RepoError) -> ServiceError {
    match err {
        RepoError::NotFound => ServiceError::NotFound("post"),
        other => ServiceError::Repo(other),
    }
}
