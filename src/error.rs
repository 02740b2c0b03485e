// HTTP API Error Types
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::database::StoreError;
use crate::services::programmer::{AuthorizationError, FieldErrors, MalformedBody};

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Every way a request can fail. Each kind maps to exactly one status code
/// and one stable `type` string in the problem payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    // 400 Bad Request
    InvalidBodyFormat(String),
    ValidationError { field_errors: FieldErrors },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(Option<String>),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidBodyFormat(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Problem `type` clients branch on
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidBodyFormat(_) => "invalid_body_format",
            ApiError::ValidationError { .. } => "validation_error",
            ApiError::Unauthorized(_) => "authentication_required",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::InternalServerError(_) => "internal_error",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ApiError::InvalidBodyFormat(_) => "Invalid JSON format sent",
            ApiError::ValidationError { .. } => "There was a validation error",
            ApiError::Unauthorized(_) => "Authentication required",
            ApiError::Forbidden(_) => "Forbidden",
            ApiError::NotFound(_) => "Not Found",
            ApiError::PayloadTooLarge(_) => "Payload Too Large",
            ApiError::InternalServerError(_) => "Internal Server Error",
            ApiError::ServiceUnavailable(_) => "Service Unavailable",
        }
    }

    /// Client-safe detail message, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::InvalidBodyFormat(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => Some(msg.as_str()),
            ApiError::NotFound(detail) => detail.as_deref(),
            ApiError::ValidationError { .. } => None,
        }
    }

    /// Convert to the problem payload
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "type": self.error_code(),
            "title": self.title(),
            "status": self.status_code(),
        });

        if let ApiError::ValidationError { field_errors } = self {
            response["errors"] = json!(field_errors);
        }
        if let Some(detail) = self.detail() {
            response["detail"] = json!(detail);
        }

        response
    }
}

impl ApiError {
    pub fn invalid_body_format(message: impl Into<String>) -> Self {
        ApiError::InvalidBodyFormat(message.into())
    }

    pub fn validation_error(field_errors: FieldErrors) -> Self {
        ApiError::ValidationError { field_errors }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        ApiError::NotFound(Some(detail.into()))
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<MalformedBody> for ApiError {
    fn from(err: MalformedBody) -> Self {
        ApiError::invalid_body_format(err.to_string())
    }
}

impl From<AuthorizationError> for ApiError {
    fn from(err: AuthorizationError) -> Self {
        match err {
            AuthorizationError::Unauthenticated => ApiError::unauthorized(err.to_string()),
            AuthorizationError::Forbidden => ApiError::forbidden(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { field, message } => {
                tracing::info!("Store rejected write on {}: {}", field, message);
                ApiError::validation_error(FieldErrors::single(
                    field,
                    crate::services::programmer::validation::NICKNAME_TAKEN,
                ))
            }
            StoreError::Missing(id) => {
                tracing::warn!("Programmer {} vanished during update", id);
                ApiError::NotFound(None)
            }
            StoreError::Unavailable(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                ApiError::service_unavailable("Storage temporarily unavailable")
            }
            StoreError::InvalidRecord(msg) | StoreError::QueryError(msg) => {
                // Don't expose internal store errors to clients
                tracing::error!("Store error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.detail() {
            Some(detail) => write!(f, "{}: {}", self.title(), detail),
            None => write!(f, "{}", self.title()),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.to_json())).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_CONTENT_TYPE));
        response
    }
}
