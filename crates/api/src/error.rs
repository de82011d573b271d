use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sketchform_canvas::CanvasError;
use sketchform_core::error::CoreError;
use sketchform_store::RecordStoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the component errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `sketchform_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Canvas(#[from] CanvasError),

    #[error(transparent)]
    Records(#[from] RecordStoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Canvas(err) => match err {
                CanvasError::NothingToUndo => {
                    (StatusCode::CONFLICT, "NOTHING_TO_UNDO", err.to_string())
                }
                CanvasError::NothingToRedo => {
                    (StatusCode::CONFLICT, "NOTHING_TO_REDO", err.to_string())
                }
                CanvasError::Core(core) => classify_core_error(core),
                other => internal(other),
            },

            AppError::Records(err) => match err {
                RecordStoreError::Core(core) => classify_core_error(core),
                RecordStoreError::Persist(source) => {
                    tracing::error!(error = %source, "Record persistence failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORAGE_ERROR",
                        "The change was applied but could not be saved".to_string(),
                    )
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::OutOfBounds { .. } => {
            (StatusCode::NOT_FOUND, "OUT_OF_BOUNDS", core.to_string())
        }
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Parse(msg) => (StatusCode::BAD_REQUEST, "PARSE_ERROR", msg.clone()),
    }
}

fn internal(err: &dyn std::fmt::Display) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %err, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
