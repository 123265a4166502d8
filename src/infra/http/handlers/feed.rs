use axum::Json;
use axum::extract::{Extension, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::domain::visibility::Viewer;
use crate::infra::http::error::ApiError;
use crate::infra::http::extract::ApiQuery;
use crate::infra::http::state::ApiState;

use super::feed_to_api;

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

pub async fn get_feed(
    State(state): State<ApiState>,
    Extension(viewer): Extension<Viewer>,
    ApiQuery(params): ApiQuery<FeedParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .feed
        .get_feed(&viewer, params.page, params.page_size)
        .await?;

    Ok(Json(feed_to_api(page)))
}
