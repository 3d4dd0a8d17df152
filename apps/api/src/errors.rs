use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::chat::ChatError;
use crate::documents::diet_chart::EditError;
use crate::layout::ComposeError;

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    InvalidFields(Vec<FieldError>),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Document error: {0}")]
    Compose(#[from] ComposeError),

    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    #[error("Chat is not configured")]
    ChatUnavailable,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<EditError> for AppError {
    fn from(e: EditError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidFields(fields) => {
                let body = Json(json!({
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "message": self.to_string(),
                        "fields": fields,
                    }
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid credentials".to_string(),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Compose(e) => {
                tracing::error!("Document error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DOCUMENT_ERROR",
                    "The document could not be generated".to_string(),
                )
            }
            AppError::Chat(e) => {
                tracing::error!("Chat error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "CHAT_ERROR",
                    "Oops! Something went wrong. Please try again!".to_string(),
                )
            }
            AppError::ChatUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CHAT_UNAVAILABLE",
                "The assistant is not available right now".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
