//! API errors and their HTTP mapping.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use merkle_accumulator::AccumulatorError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Tree(#[from] AccumulatorError),
    #[error("Invalid field element: {0}")]
    InvalidField(String),
    #[error("Snapshot IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot was built with {field} {found}, configured {configured}")]
    ConfigMismatch {
        field: &'static str,
        found: String,
        configured: String,
    },
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Tree(AccumulatorError::TreeFull { .. }) => StatusCode::CONFLICT,
            ApiError::Tree(AccumulatorError::OutOfRange { .. }) => StatusCode::NOT_FOUND,
            ApiError::Tree(_) | ApiError::Io(_) | ApiError::ConfigMismatch { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::InvalidField(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
