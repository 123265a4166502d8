//! In-memory repositories and service wiring shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use axum::Router;
use time::{Duration, OffsetDateTime, macros::datetime};
use uuid::Uuid;

use agora::application::engagement::EngagementService;
use agora::application::feed::FeedService;
use agora::application::hooks::{CommitHooks, EngagementNotifier};
use agora::application::identity::{
    IdentityProvider, RegisterCommand, TokenIdentityService,
};
use agora::application::pagination::PageLimits;
use agora::application::posts::{CreatePostCommand, PostPolicy, PostService};
use agora::application::repos::{
    CreateCommentParams, CreatePostParams, CreateUserParams, EngagementRepo, FeedQuery, LikeParams,
    PasswordCredentials, PostsRepo, PostsWriteRepo, RepoError, StorageHealth, UpdatePostParams,
    UserCredentials, UsersRepo,
};
use agora::cache::{CacheConfig, CacheTrigger, FeedCache};
use agora::domain::entities::{CommentRecord, FeedItem, LikeRecord, PostRecord, UserRecord};
use agora::domain::types::{PostKind, Privacy};
use agora::domain::visibility::Viewer;
use agora::infra::http::{ApiState, build_router};

#[derive(Default)]
struct Tables {
    users: Vec<UserRow>,
    posts: HashMap<Uuid, PostRecord>,
    likes: Vec<LikeRecord>,
    comments: Vec<CommentRecord>,
}

struct UserRow {
    record: UserRecord,
    password_hash: String,
    token_prefix: String,
    token_hash: Vec<u8>,
}

/// Repository double backed by plain collections.
///
/// Timestamps come from a deterministic clock that advances one second per
/// write unless frozen.
pub struct MemoryStore {
    tables: Mutex<Tables>,
    clock: Mutex<OffsetDateTime>,
    frozen: Mutex<bool>,
    feed_queries: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            clock: Mutex::new(datetime!(2026-01-01 00:00 UTC)),
            frozen: Mutex::new(false),
            feed_queries: AtomicUsize::new(0),
        }
    }
}

impl MemoryStore {
    /// Number of feed reads that reached the store.
    pub fn feed_queries(&self) -> usize {
        self.feed_queries.load(Ordering::SeqCst)
    }

    pub fn freeze_clock(&self) {
        *self.frozen.lock().expect("clock lock") = true;
    }

    pub fn insert_post(&self, post: PostRecord) {
        self.tables
            .lock()
            .expect("tables lock")
            .posts
            .insert(post.id, post);
    }

    pub fn insert_comment(&self, comment: CommentRecord) {
        self.tables
            .lock()
            .expect("tables lock")
            .comments
            .push(comment);
    }

    pub fn like_rows(&self, post_id: Uuid) -> usize {
        let tables = self.tables.lock().expect("tables lock");
        tables.likes.iter().filter(|l| l.post_id == post_id).count()
    }

    pub fn comment_rows(&self, post_id: Uuid) -> usize {
        let tables = self.tables.lock().expect("tables lock");
        tables.comments.iter().filter(|c| c.post_id == post_id).count()
    }

    fn now(&self) -> OffsetDateTime {
        let mut clock = self.clock.lock().expect("clock lock");
        let now = *clock;
        if !*self.frozen.lock().expect("clock lock") {
            *clock = now + Duration::seconds(1);
        }
        now
    }
}

fn visible_to(post: &PostRecord, viewer_id: Option<Uuid>) -> bool {
    post.privacy == Privacy::Public || Some(post.author_id) == viewer_id
}

#[async_trait]
impl UsersRepo for MemoryStore {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError> {
        let created_at = self.now();
        let mut tables = self.tables.lock().expect("tables lock");
        if tables
            .users
            .iter()
            .any(|u| u.record.username == params.username)
        {
            return Err(RepoError::Duplicate {
                constraint: "users_username_key".to_string(),
            });
        }
        if tables.users.iter().any(|u| u.record.email == params.email) {
            return Err(RepoError::Duplicate {
                constraint: "users_email_key".to_string(),
            });
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            username: params.username,
            email: params.email,
            role: params.role,
            display_name: params.display_name,
            bio: params.bio,
            created_at,
        };
        tables.users.push(UserRow {
            record: record.clone(),
            password_hash: params.password_hash,
            token_prefix: params.token_prefix,
            token_hash: params.token_hash,
        });
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        let tables = self.tables.lock().expect("tables lock");
        Ok(tables
            .users
            .iter()
            .find(|u| u.record.id == id)
            .map(|u| u.record.clone()))
    }

    async fn find_credentials(
        &self,
        token_prefix: &str,
    ) -> Result<Option<UserCredentials>, RepoError> {
        let tables = self.tables.lock().expect("tables lock");
        Ok(tables
            .users
            .iter()
            .find(|u| u.token_prefix == token_prefix)
            .map(|u| UserCredentials {
                user: u.record.clone(),
                token_hash: u.token_hash.clone(),
            }))
    }

    async fn find_password(
        &self,
        username: &str,
    ) -> Result<Option<PasswordCredentials>, RepoError> {
        let tables = self.tables.lock().expect("tables lock");
        Ok(tables
            .users
            .iter()
            .find(|u| u.record.username == username)
            .map(|u| PasswordCredentials {
                user: u.record.clone(),
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn rotate_token(
        &self,
        user_id: Uuid,
        token_prefix: &str,
        token_hash: Vec<u8>,
    ) -> Result<(), RepoError> {
        let mut tables = self.tables.lock().expect("tables lock");
        let row = tables
            .users
            .iter_mut()
            .find(|u| u.record.id == user_id)
            .ok_or(RepoError::NotFound)?;
        row.token_prefix = token_prefix.to_string();
        row.token_hash = token_hash;
        Ok(())
    }
}

#[async_trait]
impl PostsRepo for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let tables = self.tables.lock().expect("tables lock");
        Ok(tables.posts.get(&id).cloned())
    }

    async fn list_feed(&self, query: FeedQuery) -> Result<Vec<FeedItem>, RepoError> {
        let tables = self.tables.lock().expect("tables lock");
        let mut posts: Vec<&PostRecord> = tables
            .posts
            .values()
            .filter(|post| visible_to(post, query.viewer_id))
            .collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(posts
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .map(|post| FeedItem {
                post: post.clone(),
                like_count: tables.likes.iter().filter(|l| l.post_id == post.id).count() as u64,
                comment_count: tables
                    .comments
                    .iter()
                    .filter(|c| c.post_id == post.id)
                    .count() as u64,
            })
            .collect())
    }

    async fn count_feed(&self, viewer_id: Option<Uuid>) -> Result<u64, RepoError> {
        self.feed_queries.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.lock().expect("tables lock");
        Ok(tables
            .posts
            .values()
            .filter(|post| visible_to(post, viewer_id))
            .count() as u64)
    }

    async fn has_private_posts(&self, author_id: Uuid) -> Result<bool, RepoError> {
        let tables = self.tables.lock().expect("tables lock");
        Ok(tables
            .posts
            .values()
            .any(|post| post.author_id == author_id && post.privacy == Privacy::Private))
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.lock().expect("tables lock");
        Ok(tables
            .posts
            .values()
            .filter(|post| post.author_id == author_id)
            .count() as u64)
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryStore {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let now = self.now();
        let post = PostRecord {
            id: Uuid::new_v4(),
            author_id: params.author_id,
            title: params.title,
            content: params.content,
            privacy: params.privacy,
            kind: params.kind,
            media_url: params.media_url,
            created_at: now,
            updated_at: now,
        };
        self.insert_post(post.clone());
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let now = self.now();
        let mut tables = self.tables.lock().expect("tables lock");
        let post = tables.posts.get_mut(&params.id).ok_or(RepoError::NotFound)?;
        post.title = params.title;
        post.content = params.content;
        post.media_url = params.media_url;
        post.updated_at = now;
        Ok(post.clone())
    }

    async fn update_privacy(&self, id: Uuid, privacy: Privacy) -> Result<PostRecord, RepoError> {
        let now = self.now();
        let mut tables = self.tables.lock().expect("tables lock");
        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.privacy = privacy;
        post.updated_at = now;
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.lock().expect("tables lock");
        tables.posts.remove(&id).ok_or(RepoError::NotFound)?;
        tables.likes.retain(|like| like.post_id != id);
        tables.comments.retain(|comment| comment.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl EngagementRepo for MemoryStore {
    async fn like(&self, params: LikeParams) -> Result<bool, RepoError> {
        let created_at = self.now();
        let mut tables = self.tables.lock().expect("tables lock");
        if !tables.posts.contains_key(&params.post_id) {
            return Err(RepoError::NotFound);
        }
        if tables
            .likes
            .iter()
            .any(|l| l.user_id == params.user_id && l.post_id == params.post_id)
        {
            return Ok(false);
        }
        tables.likes.push(LikeRecord {
            id: Uuid::new_v4(),
            user_id: params.user_id,
            post_id: params.post_id,
            reaction: params.reaction,
            created_at,
        });
        Ok(true)
    }

    async fn unlike(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.lock().expect("tables lock");
        let before = tables.likes.len();
        tables
            .likes
            .retain(|l| !(l.user_id == user_id && l.post_id == post_id));
        Ok(tables.likes.len() < before)
    }

    async fn find_like(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<Option<LikeRecord>, RepoError> {
        let tables = self.tables.lock().expect("tables lock");
        Ok(tables
            .likes
            .iter()
            .find(|l| l.user_id == user_id && l.post_id == post_id)
            .cloned())
    }

    async fn add_comment(&self, params: CreateCommentParams) -> Result<CommentRecord, RepoError> {
        if !self
            .tables
            .lock()
            .expect("tables lock")
            .posts
            .contains_key(&params.post_id)
        {
            return Err(RepoError::NotFound);
        }
        let comment = CommentRecord {
            id: Uuid::new_v4(),
            post_id: params.post_id,
            user_id: params.user_id,
            text: params.text,
            created_at: self.now(),
        };
        self.insert_comment(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError> {
        let tables = self.tables.lock().expect("tables lock");
        let mut comments: Vec<CommentRecord> = tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(comments)
    }
}

#[async_trait]
impl StorageHealth for MemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

/// Fully wired services over a [`MemoryStore`].
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub cache: Arc<FeedCache>,
    pub feed: Arc<FeedService>,
    pub posts: Arc<PostService>,
    pub engagement: Arc<EngagementService>,
    pub accounts: Arc<TokenIdentityService>,
    pub state: ApiState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(PostPolicy::default(), CacheConfig::default())
    }

    pub fn with_policy(policy: PostPolicy) -> Self {
        Self::with(policy, CacheConfig::default())
    }

    pub fn with(policy: PostPolicy, cache_config: CacheConfig) -> Self {
        let store = Arc::new(MemoryStore::default());
        let posts_repo: Arc<dyn PostsRepo> = store.clone();
        let posts_write_repo: Arc<dyn PostsWriteRepo> = store.clone();
        let engagement_repo: Arc<dyn EngagementRepo> = store.clone();
        let users_repo: Arc<dyn UsersRepo> = store.clone();
        let storage: Arc<dyn StorageHealth> = store.clone();

        let cache = Arc::new(FeedCache::new(cache_config));
        let hooks = CommitHooks::new()
            .with(Arc::new(CacheTrigger::new(cache.clone())))
            .with(Arc::new(EngagementNotifier));

        let feed = Arc::new(FeedService::new(
            posts_repo.clone(),
            cache.clone(),
            PageLimits::default(),
        ));
        let posts = Arc::new(PostService::new(
            posts_repo.clone(),
            posts_write_repo,
            hooks.clone(),
            policy,
        ));
        let engagement = Arc::new(EngagementService::new(
            posts_repo,
            engagement_repo,
            hooks,
            policy,
        ));
        let accounts = Arc::new(TokenIdentityService::with_argon2(users_repo, fast_argon2()));
        let identity: Arc<dyn IdentityProvider> = accounts.clone();

        let state = ApiState {
            feed: feed.clone(),
            posts: posts.clone(),
            engagement: engagement.clone(),
            identity,
            accounts: accounts.clone(),
            storage,
        };

        Self {
            store,
            cache,
            feed,
            posts,
            engagement,
            accounts,
            state,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Registers a user with [`PASSWORD`] and returns its viewer plus bearer token.
    pub async fn register(&self, username: &str) -> (Viewer, String) {
        let registration = self
            .accounts
            .register(RegisterCommand {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: PASSWORD.to_string(),
                display_name: None,
                bio: None,
            })
            .await
            .expect("registration succeeds");
        let viewer = self
            .accounts
            .authenticate(&registration.token)
            .await
            .expect("issued token authenticates");
        (viewer, registration.token)
    }

    pub async fn create_post(&self, viewer: &Viewer, title: &str, privacy: Privacy) -> PostRecord {
        self.posts
            .create_post(viewer, text_post(title, privacy))
            .await
            .expect("post created")
    }
}

pub const PASSWORD: &str = "correct horse battery";

/// Cheapest valid Argon2id parameters, so registrations stay fast in tests.
pub fn fast_argon2() -> Argon2<'static> {
    let params = Params::new(
        Params::MIN_M_COST,
        Params::MIN_T_COST,
        Params::MIN_P_COST,
        None,
    )
    .expect("argon2 params");
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

pub fn text_post(title: &str, privacy: Privacy) -> CreatePostCommand {
    CreatePostCommand {
        title: title.to_string(),
        content: format!("content of {title}"),
        privacy,
        kind: PostKind::Text,
        media_url: None,
    }
}

pub fn post_at(id: Uuid, author_id: Uuid, created_at: OffsetDateTime) -> PostRecord {
    PostRecord {
        id,
        author_id,
        title: format!("Post {id}"),
        content: "body".to_string(),
        privacy: Privacy::Public,
        kind: PostKind::Text,
        media_url: None,
        created_at,
        updated_at: created_at,
    }
}

pub fn titles(items: &[FeedItem]) -> Vec<String> {
    items.iter().map(|item| item.post.title.clone()).collect()
}
