use std::{future::IntoFuture, process, sync::Arc};

use agora::{
    application::{
        engagement::EngagementService,
        error::AppError,
        feed::FeedService,
        hooks::{CommitHooks, EngagementNotifier},
        identity::{IdentityProvider, TokenIdentityService},
        pagination::PageLimits,
        posts::{PostPolicy, PostService},
        repos::{EngagementRepo, PostsRepo, PostsWriteRepo, StorageHealth, UsersRepo},
    },
    cache::{CacheConfig, CacheTrigger, FeedCache},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        telemetry,
    },
};
use tokio::task::JoinHandle;
use tracing::{Dispatch, Level, debug, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    info!(
        target = "agora::migrate",
        pool_size = repositories.pool().size(),
        "Migrations applied"
    );
    Ok(())
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let app = build_application_context(repositories, &settings);

    let sweep_handle = spawn_cache_sweeper(app.cache.clone());
    let result = serve_http(&settings, app.api_state).await;

    if let Some(handle) = sweep_handle {
        handle.abort();
        let _ = handle.await;
    }

    result
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or(InfraError::MissingDatabaseUrl)?;

    let pool = PostgresRepositories::connect(database_url, &settings.database)
        .await
        .map_err(|err| AppError::from(InfraError::Connect(err)))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::Migrate(err)))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

struct ApplicationContext {
    api_state: ApiState,
    cache: Arc<FeedCache>,
}

fn build_application_context(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> ApplicationContext {
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let engagement_repo: Arc<dyn EngagementRepo> = repositories.clone();
    let users_repo: Arc<dyn UsersRepo> = repositories.clone();
    let storage: Arc<dyn StorageHealth> = repositories;

    let cache = Arc::new(FeedCache::new(CacheConfig::from(&settings.cache)));
    let hooks = CommitHooks::new()
        .with(Arc::new(CacheTrigger::new(cache.clone())))
        .with(Arc::new(EngagementNotifier));

    let policy = PostPolicy::from(&settings.posts);
    let limits = PageLimits::new(
        settings.feed.default_page_size,
        settings.feed.max_page_size,
    );

    let accounts = Arc::new(TokenIdentityService::new(users_repo));
    let identity: Arc<dyn IdentityProvider> = accounts.clone();

    let api_state = ApiState {
        feed: Arc::new(FeedService::new(posts_repo.clone(), cache.clone(), limits)),
        posts: Arc::new(PostService::new(
            posts_repo.clone(),
            posts_write_repo,
            hooks.clone(),
            policy,
        )),
        engagement: Arc::new(EngagementService::new(
            posts_repo,
            engagement_repo,
            hooks,
            policy,
        )),
        identity,
        accounts,
        storage,
    };

    ApplicationContext { api_state, cache }
}

fn spawn_cache_sweeper(cache: Arc<FeedCache>) -> Option<JoinHandle<()>> {
    if !cache.is_enabled() {
        return None;
    }

    let period = cache.config().sweep_interval();
    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            let purged = cache.sweep_expired();
            if purged > 0 {
                debug!(target = "agora::cache", purged, "Expired feed pages purged");
            }
        }
    }))
}

async fn serve_http(settings: &config::Settings, api_state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(api_state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target = "agora::serve",
        addr = %settings.server.addr,
        "Listening"
    );

    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    let grace = settings.server.graceful_shutdown;

    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = async {
            shutdown_signal().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                target = "agora::serve",
                grace_seconds = grace.as_secs(),
                "Graceful shutdown timed out; dropping open connections"
            );
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(target = "agora::serve", error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(target = "agora::serve", "Shutdown signal received");
}
