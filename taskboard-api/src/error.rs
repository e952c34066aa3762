/// Error handling for the API server
///
/// Every handler returns [`ApiResult`]. Service errors convert into
/// [`ApiError`] with `?`, and [`ApiError`] renders as a JSON body:
///
/// ```json
/// { "error": "validation_error", "message": "...", "details": [{ "field": "title", "message": "Title is required" }] }
/// ```
///
/// Internal failures always render as `500` with the message
/// "Something went wrong"; the cause is logged, never sent.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::services::{AccountError, TaskError, OPAQUE_FAILURE};
use taskboard_shared::validation::{FieldError, ValidationErrors};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 401
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 404, also for resources owned by someone else
    #[error("Not found: {0}")]
    NotFound(String),

    /// 409
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 422 with field errors
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<FieldError>),

    /// 500; the detail is logged only
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "not_found")
    pub error: String,

    pub message: String,

    /// Field errors of a validation failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    OPAQUE_FAILURE.to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::ValidationError(errors.into_inner())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Validation(errors) => errors.into(),
            TaskError::NotFound => ApiError::NotFound(err.to_string()),
            // Cause already logged by the service
            TaskError::Storage => ApiError::InternalError("task storage failure".to_string()),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(errors) => errors.into(),
            AccountError::Conflict => ApiError::Conflict(err.to_string()),
            AccountError::InvalidCredentials | AccountError::WrongProvider(_) => {
                ApiError::Unauthorized(err.to_string())
            }
            AccountError::NoPassword | AccountError::IncorrectPassword => ApiError::BadRequest(err.to_string()),
            AccountError::NotFound => ApiError::NotFound(err.to_string()),
            AccountError::Storage => ApiError::InternalError("account operation failure".to_string()),
        }
    }
}
