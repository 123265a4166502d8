//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{CommentRecord, FeedItem, LikeRecord, PostRecord, UserRecord};
use crate::domain::types::{PostKind, Privacy, Reaction, Role};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Window into the visible-post feed of one viewer.
///
/// `viewer_id = None` selects public posts only; otherwise the viewer's own
/// private posts are included as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub viewer_id: Option<Uuid>,
    pub offset: u64,
    pub limit: u32,
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub token_prefix: String,
    pub token_hash: Vec<u8>,
}

/// A user with the stored hash of its bearer token secret.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: UserRecord,
    pub token_hash: Vec<u8>,
}

/// A user with its stored password hash.
#[derive(Debug, Clone)]
pub struct PasswordCredentials {
    pub user: UserRecord,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub privacy: Privacy,
    pub kind: PostKind,
    pub media_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct LikeParams {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub reaction: Reaction,
}

#[derive(Debug, Clone)]
pub struct CreateCommentParams {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub text: String,
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    /// Inserts the user together with its profile and token hash.
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError>;

    async fn find_credentials(
        &self,
        token_prefix: &str,
    ) -> Result<Option<UserCredentials>, RepoError>;

    /// Looks a user up by its (already lowercased) username.
    async fn find_password(
        &self,
        username: &str,
    ) -> Result<Option<PasswordCredentials>, RepoError>;

    /// Replaces the stored token, invalidating the previous one.
    async fn rotate_token(
        &self,
        user_id: Uuid,
        token_prefix: &str,
        token_hash: Vec<u8>,
    ) -> Result<(), RepoError>;
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;

    /// Visible posts ordered by `created_at` desc then `id` desc, with counters.
    async fn list_feed(&self, query: FeedQuery) -> Result<Vec<FeedItem>, RepoError>;

    async fn count_feed(&self, viewer_id: Option<Uuid>) -> Result<u64, RepoError>;

    async fn has_private_posts(&self, author_id: Uuid) -> Result<bool, RepoError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_privacy(&self, id: Uuid, privacy: Privacy) -> Result<PostRecord, RepoError>;

    /// Deletes the post; likes and comments go with it.
    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait EngagementRepo: Send + Sync {
    /// Returns `true` when a new like row was inserted.
    async fn like(&self, params: LikeParams) -> Result<bool, RepoError>;

    /// Returns `true` when a like row was removed.
    async fn unlike(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError>;

    async fn find_like(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<Option<LikeRecord>, RepoError>;

    async fn add_comment(&self, params: CreateCommentParams) -> Result<CommentRecord, RepoError>;

    /// Comments in creation order, ties broken by id ascending.
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError>;
}

/// Liveness check for the backing store.
#[async_trait]
pub trait StorageHealth: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
