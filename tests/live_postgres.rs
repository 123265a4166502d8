//! Exercises the Postgres repositories against a real database.
//!
//! Run with `DATABASE_URL=postgres://... cargo test --test live_postgres -- --ignored`.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use agora::application::engagement::EngagementService;
use agora::application::feed::FeedService;
use agora::application::hooks::CommitHooks;
use agora::application::identity::{
    IdentityProvider, LoginCommand, RegisterCommand, TokenIdentityService,
};
use agora::application::pagination::PageLimits;
use agora::application::posts::{CreatePostCommand, PostPolicy, PostService};
use agora::application::repos::{EngagementRepo, PostsRepo, PostsWriteRepo, UsersRepo};
use agora::cache::{CacheConfig, CacheTrigger, FeedCache};
use agora::config::DatabaseSettings;
use agora::domain::types::{PostKind, Privacy, Reaction};
use agora::domain::visibility::Viewer;
use agora::infra::db::PostgresRepositories;

fn unique_name(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", &suffix[..12])
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres database"]
async fn postgres_feed_and_likes() {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL is set");
    let settings = DatabaseSettings {
        url: Some(url.clone()),
        max_connections: NonZeroU32::new(2).expect("non-zero"),
        acquire_timeout: Duration::from_secs(5),
    };
    let pool = PostgresRepositories::connect(&url, &settings)
        .await
        .expect("connect");
    PostgresRepositories::run_migrations(&pool)
        .await
        .expect("migrations");
    let repos = Arc::new(PostgresRepositories::new(pool));

    let posts_repo: Arc<dyn PostsRepo> = repos.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repos.clone();
    let engagement_repo: Arc<dyn EngagementRepo> = repos.clone();
    let users_repo: Arc<dyn UsersRepo> = repos.clone();

    let cache = Arc::new(FeedCache::new(CacheConfig::default()));
    let hooks = CommitHooks::new().with(Arc::new(CacheTrigger::new(cache.clone())));
    let feed = FeedService::new(posts_repo.clone(), cache, PageLimits::default());
    let posts = PostService::new(
        posts_repo.clone(),
        posts_write_repo,
        hooks.clone(),
        PostPolicy::default(),
    );
    let engagement = EngagementService::new(posts_repo, engagement_repo, hooks, PostPolicy::default());
    let accounts = TokenIdentityService::new(users_repo);

    let mut viewers = Vec::new();
    for prefix in ["author", "reader"] {
        let username = unique_name(prefix);
        let registration = accounts
            .register(RegisterCommand {
                email: format!("{username}@example.com"),
                username,
                password: "correct horse battery".to_string(),
                display_name: None,
                bio: None,
            })
            .await
            .expect("register");
        viewers.push(
            accounts
                .authenticate(&registration.token)
                .await
                .expect("authenticate"),
        );
    }
    let (author, reader) = (viewers[0], viewers[1]);

    let author_record = accounts.current_user(&author).await.expect("author");
    let relogged = accounts
        .login(LoginCommand {
            username: author_record.username.to_uppercase(),
            password: "correct horse battery".to_string(),
        })
        .await
        .expect("login");
    assert_eq!(
        accounts.authenticate(&relogged.token).await.expect("new token"),
        author
    );

    let secret = posts
        .create_post(
            &author,
            CreatePostCommand {
                title: "Live private post".to_string(),
                content: "only the author sees this".to_string(),
                privacy: Privacy::Private,
                kind: PostKind::Text,
                media_url: None,
            },
        )
        .await
        .expect("create private");
    let public = posts
        .create_post(
            &author,
            CreatePostCommand {
                title: "Live public post".to_string(),
                content: "everyone sees this".to_string(),
                privacy: Privacy::Public,
                kind: PostKind::Text,
                media_url: None,
            },
        )
        .await
        .expect("create public");

    let first = engagement
        .like(&reader, public.id, Reaction::Heart)
        .await
        .expect("like");
    assert!(first.created);
    let second = engagement
        .like(&reader, public.id, Reaction::Clap)
        .await
        .expect("like again");
    assert!(!second.created);
    assert_eq!(second.reaction, Reaction::Heart);

    let own = feed
        .get_feed(&author, Some(0), Some(100))
        .await
        .expect("author feed");
    let own_ids: Vec<Uuid> = own.items.iter().map(|item| item.post.id).collect();
    assert!(own_ids.contains(&secret.id));
    let liked = own
        .items
        .iter()
        .find(|item| item.post.id == public.id)
        .expect("public post in author feed");
    assert_eq!(liked.like_count, 1);

    let other = feed
        .get_feed(&Viewer::Anonymous, Some(0), Some(100))
        .await
        .expect("anonymous feed");
    assert!(other.items.iter().all(|item| item.post.id != secret.id));

    posts.delete_post(&author, public.id).await.expect("delete");
    posts.delete_post(&author, secret.id).await.expect("delete");
}
