//! Typed API error for HTTP handlers.
//!
//! Converts domain errors into JSON responses with proper status codes.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use companion_chat_auth::AuthError;
use companion_chat_service::ServiceError;

/// API error with HTTP status code and human-readable message.
///
/// Serializes as `{"error": "message"}`. `Internal` logs the real error
/// server-side and returns a static message to the client.
#[derive(Debug)]
pub enum ApiError {
    /// 400: malformed body or failed validation.
    BadRequest(String),
    /// 401: no session or an invalid one.
    Unauthorized,
    /// 404: unknown companion or conversation.
    NotFound(String),
    /// 500: everything else. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_owned()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            },
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
            ref e if e.is_not_found() => Self::NotFound(err.to_string()),
            _ => Self::Internal(err.into()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated => Self::Unauthorized,
            AuthError::Upstream(_) => Self::Internal(err.into()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
