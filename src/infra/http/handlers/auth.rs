use agora_api_types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::identity::{LoginCommand, RegisterCommand};
use crate::domain::visibility::Viewer;
use crate::infra::http::error::ApiError;
use crate::infra::http::extract::ApiJson;
use crate::infra::http::state::ApiState;

use super::user_to_api;

pub async fn register(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let issued = state
        .accounts
        .register(RegisterCommand {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            display_name: payload.display_name,
            bio: payload.bio,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: user_to_api(issued.user),
            token: issued.token,
        }),
    ))
}

pub async fn login(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let issued = state
        .accounts
        .login(LoginCommand {
            username: payload.username,
            password: payload.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        user: user_to_api(issued.user),
        token: issued.token,
    }))
}

pub async fn current_user(
    State(state): State<ApiState>,
    Extension(viewer): Extension<Viewer>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.accounts.current_user(&viewer).await?;
    Ok(Json(user_to_api(user)))
}
