//! Post lifecycle: create, read, edit, privacy and delete.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::application::error::ServiceError;
use crate::application::hooks::{CommitEvent, CommitHooks};
use crate::application::repos::{
    CreatePostParams, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::PostRecord;
use crate::domain::posts::{normalize_title, validate_content, validate_media};
use crate::domain::types::{PostKind, Privacy};
use crate::domain::visibility::{Viewer, is_owner, is_visible};

/// Behavioural switches for post writes, built once from settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostPolicy {
    pub allow_editing: bool,
    pub allow_comments: bool,
    pub max_posts_per_user: Option<u32>,
}

impl Default for PostPolicy {
    fn default() -> Self {
        Self {
            allow_editing: true,
            allow_comments: true,
            max_posts_per_user: None,
        }
    }
}

impl From<&crate::config::PostSettings> for PostPolicy {
    fn from(settings: &crate::config::PostSettings) -> Self {
        Self {
            allow_editing: settings.allow_editing,
            allow_comments: settings.allow_comments,
            max_posts_per_user: settings.max_posts_per_user.map(|max| max.get()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
    pub privacy: Privacy,
    pub kind: PostKind,
    pub media_url: Option<String>,
}

/// Partial edit; absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostCommand {
    pub title: Option<String>,
    pub content: Option<String>,
    pub media_url: Option<String>,
}

#[derive(Clone)]
pub struct PostService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    hooks: CommitHooks,
    policy: PostPolicy,
}

impl PostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        hooks: CommitHooks,
        policy: PostPolicy,
    ) -> Self {
        Self {
            reader,
            writer,
            hooks,
            policy,
        }
    }

    pub fn policy(&self) -> PostPolicy {
        self.policy
    }

    pub async fn create_post(
        &self,
        viewer: &Viewer,
        command: CreatePostCommand,
    ) -> Result<PostRecord, ServiceError> {
        let author_id = viewer.user_id().ok_or(ServiceError::Unauthenticated)?;

        let title = normalize_title(&command.title)?;
        validate_content(&command.content)?;
        let media_url = validate_media(command.kind, command.media_url.as_deref())?;

        if let Some(limit) = self.policy.max_posts_per_user {
            let existing = self.reader.count_by_author(author_id).await?;
            if existing >= u64::from(limit) {
                return Err(ServiceError::validation(
                    "posts",
                    format!("post limit of {limit} reached"),
                ));
            }
        }

        let post = self
            .writer
            .create_post(CreatePostParams {
                author_id,
                title,
                content: command.content,
                privacy: command.privacy,
                kind: command.kind,
                media_url,
            })
            .await?;

        info!(
            target = "agora::posts",
            post_id = %post.id,
            author_id = %post.author_id,
            privacy = post.privacy.as_str(),
            kind = post.kind.as_str(),
            "post created"
        );

        self.hooks
            .dispatch(CommitEvent::PostCreated { post: post.clone() })
            .await;
        Ok(post)
    }

    /// Fetches a post the viewer may see.
    pub async fn get_post(&self, viewer: &Viewer, id: Uuid) -> Result<PostRecord, ServiceError> {
        let post = self.load(id).await?;
        if !is_visible(&post, viewer) {
            return Err(ServiceError::PermissionDenied("post is private"));
        }
        Ok(post)
    }

    pub async fn update_post(
        &self,
        viewer: &Viewer,
        id: Uuid,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, ServiceError> {
        let current = self.load_owned(viewer, id).await?;

        let title = match command.title.as_deref() {
            Some(raw) => normalize_title(raw)?,
            None => current.title.clone(),
        };
        let content = match command.content {
            Some(content) => {
                validate_content(&content)?;
                content
            }
            None => current.content.clone(),
        };
        let media_url = match command.media_url.as_deref() {
            Some(raw) => validate_media(current.kind, Some(raw))?,
            None => current.media_url.clone(),
        };

        let post = self
            .writer
            .update_post(UpdatePostParams {
                id,
                title,
                content,
                media_url,
            })
            .await
            .map_err(not_found_as_post)?;

        self.hooks
            .dispatch(CommitEvent::PostUpdated { post: post.clone() })
            .await;
        Ok(post)
    }

    pub async fn set_privacy(
        &self,
        viewer: &Viewer,
        id: Uuid,
        privacy: Privacy,
    ) -> Result<PostRecord, ServiceError> {
        let current = self.load_owned(viewer, id).await?;

        let post = self
            .writer
            .update_privacy(id, privacy)
            .await
            .map_err(not_found_as_post)?;

        info!(
            target = "agora::posts",
            post_id = %post.id,
            from = current.privacy.as_str(),
            to = post.privacy.as_str(),
            "post privacy set"
        );

        let event = if current.privacy == post.privacy {
            CommitEvent::PostUpdated { post: post.clone() }
        } else {
            CommitEvent::PostPrivacyChanged {
                post: post.clone(),
                previous: current.privacy,
            }
        };
        self.hooks.dispatch(event).await;
        Ok(post)
    }

    pub async fn delete_post(&self, viewer: &Viewer, id: Uuid) -> Result<(), ServiceError> {
        viewer.user_id().ok_or(ServiceError::Unauthenticated)?;
        let post = self.load(id).await?;
        if !is_owner(&post, viewer) {
            return Err(ServiceError::PermissionDenied("only the author may delete a post"));
        }

        self.writer
            .delete_post(id)
            .await
            .map_err(not_found_as_post)?;

        info!(target = "agora::posts", post_id = %id, "post deleted");
        self.hooks.dispatch(CommitEvent::PostDeleted { post }).await;
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<PostRecord, ServiceError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("post"))
    }

    async fn load_owned(&self, viewer: &Viewer, id: Uuid) -> Result<PostRecord, ServiceError> {
        viewer.user_id().ok_or(ServiceError::Unauthenticated)?;
        let post = self.load(id).await?;
        if !is_owner(&post, viewer) {
            return Err(ServiceError::PermissionDenied("only the author may edit a post"));
        }
        if !self.policy.allow_editing {
            return Err(ServiceError::PermissionDenied("post editing is disabled"));
        }
        Ok(post)
    }
}

fn not_found_as_post(err: RepoError) -> ServiceError {
    match err {
        RepoError::NotFound => ServiceError::NotFound("post"),
        other => ServiceError::Repo(other),
    }
}
