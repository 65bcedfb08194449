use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Topic matched the moderation blocklist.
    #[error("This topic isn't allowed. Try a different angle.")]
    Blocked { topic: String },

    #[error("{message}")]
    QuotaExceeded { message: String },

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Blocked { topic } => {
                tracing::info!("Rejected blocked topic: {topic:?}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "CONTENT_BLOCKED",
                    self.to_string(),
                )
            }
            AppError::QuotaExceeded { message } => (
                StatusCode::TOO_MANY_REQUESTS,
                "DAILY_LIMIT",
                message.clone(),
            ),
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    format!("Failed to generate: {e}"),
                )
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "Failed to generate: could not write pack files".to_string(),
                )
            }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_exceeded_maps_to_429() {
        let response = AppError::QuotaExceeded {
            message: "Daily limit reached. Upgrade for more.".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_blocked_maps_to_422() {
        let response = AppError::Blocked {
            topic: "hate speech".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_blocked_message_is_user_facing() {
        let err = AppError::Blocked {
            topic: "x".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "This topic isn't allowed. Try a different angle."
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("topic cannot be empty".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
