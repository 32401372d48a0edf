//! Application error type mapping to HTTP status codes.
//!
//! Error bodies are `{"status": false, "message": "..."}`. Storage and
//! signing failures are logged where they occur and reported with a generic
//! message.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use cerium_types::error::{AuthError, FormError, UpstreamStage};

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Form and response errors.
    Form(FormError),
    /// Login and session errors.
    Auth(AuthError),
    /// Undecodable request body or query.
    BadRequest(String),
    /// Generic internal error.
    Internal(String),
}

impl From<FormError> for AppError {
    fn from(e: FormError) -> Self {
        AppError::Form(e)
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Form(FormError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Form(FormError::Unauthenticated(msg)) => {
                (StatusCode::UNAUTHORIZED, format!("Unauthorized: {msg}"))
            }
            AppError::Form(FormError::Forbidden(msg)) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Form(FormError::AlreadyFilled) => (
                StatusCode::FORBIDDEN,
                "User has already filled this form".to_string(),
            ),
            AppError::Form(FormError::NotFound) => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            AppError::Form(FormError::Closed) => (
                StatusCode::NOT_FOUND,
                "Form is closed for responses".to_string(),
            ),
            AppError::Form(FormError::StorageError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            AppError::Auth(AuthError::Unauthenticated(msg)) => {
                (StatusCode::UNAUTHORIZED, format!("Unauthorized: {msg}"))
            }
            AppError::Auth(AuthError::Upstream {
                stage: UpstreamStage::TokenExchange,
                ..
            }) => (
                StatusCode::UNAUTHORIZED,
                "Could not verify authorization code".to_string(),
            ),
            AppError::Auth(AuthError::Upstream {
                stage: UpstreamStage::Profile,
                ..
            }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not fetch user profile".to_string(),
            ),
            AppError::Auth(AuthError::ProfileNotFound) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Profile not found".to_string(),
            ),
            AppError::Auth(AuthError::Signing(_) | AuthError::StorageError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if let AppError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "internal error");
        }

        (status, Json(json!({"status": false, "message": message}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(e: AppError) -> StatusCode {
        e.status_and_message().0
    }

    #[test]
    fn test_form_error_statuses() {
        assert_eq!(status(FormError::Validation("No Pages".into()).into()), StatusCode::BAD_REQUEST);
        assert_eq!(status(FormError::Unauthenticated("x".into()).into()), StatusCode::UNAUTHORIZED);
        assert_eq!(status(FormError::Forbidden("x".into()).into()), StatusCode::FORBIDDEN);
        assert_eq!(status(FormError::AlreadyFilled.into()), StatusCode::FORBIDDEN);
        assert_eq!(status(FormError::NotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(status(FormError::Closed.into()), StatusCode::NOT_FOUND);
        assert_eq!(
            status(FormError::StorageError("x".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_statuses_depend_on_stage() {
        let exchange = AuthError::Upstream {
            stage: UpstreamStage::TokenExchange,
            message: "status 400".into(),
        };
        let profile = AuthError::Upstream {
            stage: UpstreamStage::Profile,
            message: "bad json".into(),
        };
        assert_eq!(status(exchange.into()), StatusCode::UNAUTHORIZED);
        assert_eq!(status(profile.into()), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_message_is_not_echoed() {
        let (_, message) =
            AppError::from(FormError::StorageError("disk I/O error at /var/db".into()))
                .status_and_message();
        assert_eq!(message, INTERNAL_MESSAGE);
    }
}
