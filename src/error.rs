use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Service-level errors. Parse and normalization failures inside the
/// listing pipeline never reach this type: they are downgraded to
/// placeholders at the per-cell boundary (see `services::listing`).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Please select at least one Excel file.")]
    MissingInput,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("File processing error: {0}")]
    FileProcessing(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingInput | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Http(_) => StatusCode::BAD_GATEWAY,
            AppError::FileProcessing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
