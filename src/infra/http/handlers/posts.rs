use agora_api_types::{PostCreateRequest, PostPrivacyRequest, PostUpdateRequest};
use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::posts::{CreatePostCommand, UpdatePostCommand};
use crate::domain::visibility::Viewer;
use crate::infra::http::error::ApiError;
use crate::infra::http::extract::{ApiJson, ApiPath};
use crate::infra::http::state::ApiState;

use super::post_to_api;

pub async fn create_post(
    State(state): State<ApiState>,
    Extension(viewer): Extension<Viewer>,
    ApiJson(payload): ApiJson<PostCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = CreatePostCommand {
        title: payload.title,
        content: payload.content,
        privacy: payload.privacy.unwrap_or_default(),
        kind: payload.kind.unwrap_or_default(),
        media_url: payload.media_url,
    };

    let post = state.posts.create_post(&viewer, command).await?;
    Ok((StatusCode::CREATED, Json(post_to_api(post))))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Extension(viewer): Extension<Viewer>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.posts.get_post(&viewer, id).await?;
    Ok(Json(post_to_api(post)))
}

pub async fn update_post(
    State(state): State<ApiState>,
    Extension(viewer): Extension<Viewer>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PostUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = UpdatePostCommand {
        title: payload.title,
        content: payload.content,
        media_url: payload.media_url,
    };

    let post = state.posts.update_post(&viewer, id, command).await?;
    Ok(Json(post_to_api(post)))
}

pub async fn set_privacy(
    State(state): State<ApiState>,
    Extension(viewer): Extension<Viewer>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PostPrivacyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.posts.set_privacy(&viewer, id, payload.privacy).await?;
    Ok(Json(post_to_api(post)))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    Extension(viewer): Extension<Viewer>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.posts.delete_post(&viewer, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
