use agora_api_types::{
    CommentCreateRequest, CommentListView, LikeRequest, LikeResponse, UnlikeResponse,
};
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::domain::reactions;
use crate::domain::visibility::Viewer;
use crate::infra::http::error::ApiError;
use crate::infra::http::extract::{ApiJson, ApiPath};
use crate::infra::http::state::ApiState;

use super::comment_to_api;

/// The body is optional; an empty one likes with the default reaction.
pub async fn like_post(
    State(state): State<ApiState>,
    Extension(viewer): Extension<Viewer>,
    ApiPath(id): ApiPath<Uuid>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request = parse_like_body(&body)?;
    let outcome = state
        .engagement
        .like(&viewer, id, request.reaction.unwrap_or_default())
        .await?;

    let (status, message) = if outcome.created {
        (
            StatusCode::CREATED,
            format!("Post {}.", reactions::verb(outcome.reaction)),
        )
    } else {
        (StatusCode::OK, "Post already liked.".to_string())
    };

    Ok((
        status,
        Json(LikeResponse {
            post_id: outcome.post_id,
            liked: true,
            created: outcome.created,
            reaction: outcome.reaction,
            message,
        }),
    ))
}

pub async fn unlike_post(
    State(state): State<ApiState>,
    Extension(viewer): Extension<Viewer>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.engagement.unlike(&viewer, id).await?;
    let message = if outcome.removed {
        "Post unliked."
    } else {
        "Post was not liked."
    };

    Ok(Json(UnlikeResponse {
        post_id: outcome.post_id,
        removed: outcome.removed,
        message: message.to_string(),
    }))
}

pub async fn add_comment(
    State(state): State<ApiState>,
    Extension(viewer): Extension<Viewer>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CommentCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state
        .engagement
        .add_comment(&viewer, id, payload.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment_to_api(comment))))
}

pub async fn list_comments(
    State(state): State<ApiState>,
    Extension(viewer): Extension<Viewer>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let comments = state.engagement.list_comments(&viewer, id).await?;
    Ok(Json(CommentListView {
        items: comments.into_iter().map(comment_to_api).collect(),
    }))
}

fn parse_like_body(body: &[u8]) -> Result<LikeRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(LikeRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::invalid_request(err.to_string()))
}
