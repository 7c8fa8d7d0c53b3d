//! HTTP mapping of [`HekimError`].
//!
//! | Error | HTTP Status | Code |
//! |-------|-------------|------|
//! | AuthenticationFailed | 401 | unauthenticated |
//! | Forbidden | 403 | forbidden |
//! | Validation | 422 | validation |
//! | PasswordReset | 400 | reset-failed |
//! | InvalidInput | 400 | invalid |
//! | NotFound | 404 | not-found |
//! | Conflict | 409 | conflict |
//! | Unavailable | 503 | unavailable |
//! | Database, Crypto, Internal | 500 | internal |
//!
//! Authentication failures and internal errors carry a generic message;
//! their detail only reaches the log.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hekim_core::error::{Denial, FieldViolation, HekimError};
use serde::Serialize;
use tracing::{debug, error};

#[derive(Debug)]
pub struct ApiError(pub HekimError);

impl From<HekimError> for ApiError {
    fn from(err: HekimError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(HekimError::InvalidInput {
            message: rejection.body_text(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<FieldViolation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<&'static str>,
}

impl ErrorBody {
    fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
            violations: Vec::new(),
            required: None,
            current: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            HekimError::AuthenticationFailed { reason } => {
                debug!(%reason, "Authentication failed");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorBody::new("unauthenticated", "authentication required"),
                )
            }
            HekimError::Forbidden(denial) => {
                let mut body = ErrorBody::new("forbidden", denial.to_string());
                match denial {
                    Denial::InsufficientPermission { required, current } => {
                        body.required = Some(required.name());
                        body.current = Some(current.name());
                    }
                    Denial::RoleRequired { required, current } => {
                        body.required = Some(required.as_str());
                        body.current = Some(current.as_str());
                    }
                    Denial::CrossTenant | Denial::SelfTarget => {}
                }
                (StatusCode::FORBIDDEN, body)
            }
            HekimError::Validation(violations) => {
                let mut body = ErrorBody::new("validation", "submission has invalid fields");
                body.violations = violations;
                (StatusCode::UNPROCESSABLE_ENTITY, body)
            }
            HekimError::PasswordReset(failure) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("reset-failed", failure.to_string()),
            ),
            HekimError::InvalidInput { message } => {
                (StatusCode::BAD_REQUEST, ErrorBody::new("invalid", message))
            }
            HekimError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("not-found", format!("{entity} {id} not found")),
            ),
            HekimError::Conflict { entity, constraint } => (
                StatusCode::CONFLICT,
                ErrorBody::new(
                    "conflict",
                    format!("{entity} violates unique constraint {constraint}"),
                ),
            ),
            err @ HekimError::Unavailable(_) => {
                error!(error = %err, "Upstream unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody::new("unavailable", "service temporarily unavailable"),
                )
            }
            err => {
                error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("internal", "internal server error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
