use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdf_qa::QaError;
use serde_json::json;

pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

/// Error returned by every handler, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Keep client errors as they are; log server errors and hide their detail.
    pub fn masked(err: QaError) -> Self {
        if err.is_client_error() {
            err.into()
        } else {
            log::error!("Error: {}", err);
            Self::new(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_MESSAGE)
        }
    }
}

impl From<QaError> for ApiError {
    fn from(err: QaError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
