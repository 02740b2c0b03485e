use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};

use crate::error::ApiError;

/// Raw request body.
///
/// Same as axum's `Bytes` extractor, except failures to read the body
/// (including `DefaultBodyLimit`) are reported as `ApiError`.
#[derive(Debug, Clone)]
pub struct RawBody(pub Bytes);

#[async_trait]
impl<S> FromRequest<S> for RawBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Bytes::from_request(req, state).await {
            Ok(bytes) => Ok(Self(bytes)),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                tracing::debug!("Request body over limit: {}", rejection.body_text());
                Err(ApiError::payload_too_large("Request body exceeds the configured size limit"))
            }
            Err(rejection) => Err(ApiError::invalid_body_format(rejection.body_text())),
        }
    }
}

impl std::ops::Deref for RawBody {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::DefaultBodyLimit, http, routing::post, Router};
    use tower::ServiceExt;

    async fn echo_len(body: RawBody) -> String {
        body.len().to_string()
    }

    fn router(limit: usize) -> Router {
        Router::new()
            .route("/", post(echo_len))
            .layer(DefaultBodyLimit::max(limit))
    }

    #[tokio::test]
    async fn body_within_limit_is_read() {
        let response = router(16)
            .oneshot(http::Request::post("/").body(Body::from("{}")).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn body_over_limit_is_a_problem_response() {
        let response = router(4)
            .oneshot(http::Request::post("/").body(Body::from("{\"nickname\": \"ezra\"}")).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            crate::error::PROBLEM_CONTENT_TYPE
        );
    }
}
