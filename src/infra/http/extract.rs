//! Extractors whose rejections render as [`ApiError`] bodies.
//!
//! Axum's own `Json`, `Query` and `Path` reject with plain-text responses; these
//! wrappers keep malformed input inside the JSON error envelope.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use super::error::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::invalid_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        privacy: crate::domain::types::Privacy,
    }

    #[tokio::test]
    async fn unknown_enum_value_becomes_validation_error() {
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"privacy":"friends"}"#))
            .expect("request");

        let err = ApiJson::<Payload>::from_request(request, &())
            .await
            .expect_err("unknown variant");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), crate::infra::http::codes::VALIDATION);
    }

    #[tokio::test]
    async fn missing_content_type_is_rejected_the_same_way() {
        let request = Request::builder()
            .method("POST")
            .body(Body::from(r#"{"privacy":"public"}"#))
            .expect("request");

        let err = ApiJson::<Payload>::from_request(request, &())
            .await
            .expect_err("no content type");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
