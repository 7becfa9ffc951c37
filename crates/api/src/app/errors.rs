//! The single place where failures become HTTP responses.
//!
//! Every error body is `{ "error": <code>, "message": <text> }`. Internal
//! faults are logged here and answered with a generic message.

use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use stockroom_auth::AuthError;
use stockroom_core::DomainError;

/// Why a caller was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unauthorized {
    MissingToken,
    InvalidToken,
    InvalidCredentials,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    InvalidRequest { code: &'static str, message: String },

    #[error("unauthorized: {0:?}")]
    Unauthorized(Unauthorized),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn invalid_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            code,
            message: message.into(),
        }
    }

    /// Log `cause` server-side and return the generic internal error.
    pub fn internal(cause: impl core::fmt::Display) -> Self {
        tracing::error!(error = %cause, "internal error while handling request");
        Self::Internal
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(Unauthorized::InvalidToken) => StatusCode::FORBIDDEN,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code_and_message(&self) -> (&'static str, String) {
        match self {
            ApiError::InvalidRequest { code, message } => (*code, message.clone()),
            ApiError::Unauthorized(Unauthorized::MissingToken) => {
                ("missing_token", "Access token required".to_string())
            }
            ApiError::Unauthorized(Unauthorized::InvalidToken) => {
                ("invalid_token", "Invalid or expired token".to_string())
            }
            ApiError::Unauthorized(Unauthorized::InvalidCredentials) => {
                ("invalid_credentials", "Invalid credentials".to_string())
            }
            ApiError::NotFound(what) => ("not_found", what.to_string()),
            ApiError::Internal => ("internal_error", "Internal server error".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message) = self.code_and_message();
        json_error(self.status(), code, message)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingFields => {
                ApiError::invalid_request("missing_fields", "Email and password are required")
            }
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized(Unauthorized::InvalidCredentials)
            }
            other => ApiError::internal(other),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::invalid_request("invalid_fields", msg),
            DomainError::NotFound => ApiError::NotFound("Product not found"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_request("invalid_body", rejection.body_text())
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Response for a handler that panicked. The panic payload is logged only.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());

    ApiError::internal(format!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_taxonomy() {
        assert_eq!(
            ApiError::invalid_request("invalid_fields", "x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized(Unauthorized::MissingToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Unauthorized(Unauthorized::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Unauthorized(Unauthorized::InvalidToken).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::NotFound("Product not found").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn domain_errors_map_to_client_errors() {
        let err: ApiError = DomainError::validation("price cannot be negative").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = DomainError::NotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn auth_errors_do_not_leak_internals() {
        let err: ApiError = AuthError::Task("worker vanished".to_string()).into();
        assert!(matches!(err, ApiError::Internal));
        let (_, message) = err.code_and_message();
        assert!(!message.contains("worker"));
    }

    #[test]
    fn panic_payloads_become_500() {
        let res = panic_response(Box::new("boom"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
