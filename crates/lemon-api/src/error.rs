use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use lemon_core::error::{DomainError, FieldErrors};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {message}")]
    Validation { message: String, fields: FieldErrors },

    #[error("Request was throttled. Expected available in {retry_after_seconds} seconds.")]
    TooManyRequests { retry_after_seconds: u64 },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, error_type, message, fields) = match self {
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, "Unauthorized", msg, None)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NotFound", msg, None)
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BadRequest", msg, None)
            }
            ApiError::Validation { message: msg, fields } => {
                tracing::warn!("Validation failed: {}", msg);
                (StatusCode::BAD_REQUEST, "ValidationError", msg, Some(fields))
            }
            ApiError::TooManyRequests { retry_after_seconds } => {
                tracing::warn!("Throttled for {}s", retry_after_seconds);
                let body = Json(ErrorResponse {
                    error: "TooManyRequests".to_string(),
                    message,
                    fields: None,
                });
                let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_seconds));
                return response;
            }
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError", msg, None)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError", msg, None)
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            fields,
        });

        (status, body).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::Validation(fields) => ApiError::Validation { message, fields },
            DomainError::NotFound { .. } => ApiError::NotFound(message),
            DomainError::Unauthenticated(_)
            | DomainError::Forbidden => ApiError::Unauthorized(message),
            DomainError::CartEmpty
            | DomainError::InvalidOrdering(_)
            | DomainError::InvalidQuery { .. }
            | DomainError::Duplicate(_)
            | DomainError::Protected { .. }
            | DomainError::InvalidCredentials => ApiError::BadRequest(message),
            // Driver details stay in the logs.
            DomainError::DatabaseError(detail) => {
                tracing::error!("Database failure: {}", detail);
                ApiError::DatabaseError("A database error occurred".to_string())
            }
            DomainError::InternalError(detail) => {
                tracing::error!("Internal failure: {}", detail);
                ApiError::InternalError("An internal error occurred".to_string())
            }
        }
    }
}
