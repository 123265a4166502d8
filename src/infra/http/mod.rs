mod error;
mod extract;
mod handlers;
mod middleware;
mod state;

pub use error::{ApiError, codes, repo_to_api, service_to_api};
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use middleware::RequestContext;
pub use state::ApiState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, post},
};

pub fn build_router(state: ApiState) -> Router {
    let auth_state = state.clone();

    Router::new()
        .route("/feed", get(handlers::get_feed))
        .route("/posts", post(handlers::create_post))
        .route(
            "/posts/{id}",
            get(handlers::get_post)
                .patch(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/posts/{id}/privacy", patch(handlers::set_privacy))
        .route("/posts/{id}/like", post(handlers::like_post))
        .route("/posts/{id}/unlike", post(handlers::unlike_post))
        .route("/posts/{id}/comment", post(handlers::add_comment))
        .route("/posts/{id}/comments", get(handlers::list_comments))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/me", get(handlers::current_user))
        .route("/config", get(handlers::get_settings))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(
            auth_state,
            middleware::resolve_viewer,
        ))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
}
