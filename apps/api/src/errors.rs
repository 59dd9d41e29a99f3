use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::document::validate::FieldError;
use crate::export::ExportError;
use crate::generation::GenerationError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// No variant is fatal to a session: validation blocks a save until fixed,
/// and the generation/persistence/export failures are transient — the
/// in-memory document state is never cleared on failure, so the user can
/// always retry.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Persistence(msg) => AppError::Persistence(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Per-field body so the client can attach messages to inputs.
            AppError::Validation(fields) => {
                let body = Json(json!({
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "fields": fields
                    }
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            AppError::NotFound(msg) => {
                error_response(StatusCode::NOT_FOUND, "NOT_FOUND", &msg)
            }
            AppError::Generation(e) => {
                tracing::error!("generation error: {e}");
                error_response(StatusCode::BAD_GATEWAY, "GENERATION_ERROR", &e.to_string())
            }
            // The message is surfaced verbatim; nothing was mutated, so the
            // client can retry without data loss.
            AppError::Persistence(msg) => {
                tracing::error!("persistence error: {msg}");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    &msg,
                )
            }
            AppError::Export(e) => {
                tracing::error!("export error: {e}");
                error_response(StatusCode::BAD_GATEWAY, "EXPORT_ERROR", &e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("internal error: {e:?}");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred",
                )
            }
        }
    }
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    let body = Json(json!({
        "error": {
            "code": code,
            "message": message
        }
    }));
    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::Validation(vec![FieldError {
            field: "experience[0].title".to_string(),
            message: "Title is required".to_string(),
        }]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_not_found_maps_to_404() {
        let err: AppError = StoreError::NotFound("Cover letter x not found".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_persistence_message_preserved() {
        let err: AppError = StoreError::Persistence("connection refused".to_string()).into();
        assert!(matches!(
            &err,
            AppError::Persistence(msg) if msg == "connection refused"
        ));
    }
}
