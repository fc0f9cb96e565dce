//! HTTP error mapping.
//!
//! Every failure collapses to the same 500 envelope; the cause is only logged.

use std::any::Any;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cleanse_core::{CleanseError, ErrorEnvelope};
use thiserror::Error;
use tracing::error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Cleanse(#[from] CleanseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Cleanse(e) => error!(error = %e, "Rejected cleanse payload"),
            AppError::Internal(msg) => error!(error = %msg, "Internal error"),
        }
        internal_error_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

/// The generic 500 response.
pub fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorEnvelope::internal()),
    )
        .into_response()
}

/// Panic handler for `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn every_error_is_a_generic_500() {
        let errors = [
            AppError::Internal("boom".into()),
            AppError::Cleanse(CleanseError::MalformedPayload {
                category: "syntax",
                line: 1,
                column: 2,
            }),
        ];
        for err in errors {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                body_json(response).await,
                serde_json::json!({ "success": false, "message": "Internal Server Error" })
            );
        }
    }

    #[tokio::test]
    async fn panic_payloads_do_not_leak() {
        let response = panic_response(Box::new("secret@example.com"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(!body.to_string().contains("secret"));
    }
}
