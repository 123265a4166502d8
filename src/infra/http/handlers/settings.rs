use agora_api_types::SettingsView;
use axum::Json;
use axum::extract::{Extension, State};
use axum::response::IntoResponse;

use crate::domain::visibility::Viewer;
use crate::infra::http::error::ApiError;
use crate::infra::http::state::ApiState;

/// Read-only view of the configured post and paging rules. Requires a token.
pub async fn get_settings(
    State(state): State<ApiState>,
    Extension(viewer): Extension<Viewer>,
) -> Result<impl IntoResponse, ApiError> {
    viewer.user_id().ok_or_else(ApiError::unauthenticated)?;

    let policy = state.posts.policy();
    let limits = state.feed.limits();
    Ok(Json(SettingsView {
        allow_editing: policy.allow_editing,
        allow_comments: policy.allow_comments,
        max_posts_per_user: policy.max_posts_per_user,
        default_page_size: limits.default_page_size(),
        max_page_size: limits.max_page_size(),
    }))
}
