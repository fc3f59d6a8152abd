use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use types::errors::ReadError;

/// Central error type for the Gateway application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Snapshot read failed: {0}")]
    Read(#[from] ReadError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            AppError::Read(err) => {
                tracing::error!(error = %err, "Snapshot read failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Snapshot storage unavailable".to_string(),
                    "STORAGE_ERROR",
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = AppError::NotFound("Dataset metadata not found.".into()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let read = AppError::from(ReadError::CorruptPointer("truncated".into())).into_response();
        assert_eq!(read.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
