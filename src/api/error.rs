//! Error-kind → HTTP status mapping for the API boundary.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::{ErrorKind, ProcessError};

/// The one place pipeline error kinds become status codes.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::BadInput => StatusCode::BAD_REQUEST,
        ErrorKind::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::ModelOutputInvalid => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON error body: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// An error returned from a handler.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl From<ProcessError> for ApiError {
    fn from(err: ProcessError) -> Self {
        let status = status_for(err.kind());
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %err, "Email processing failed");
        } else {
            warn!(status = status.as_u16(), error = %err, "Rejected email submission");
        }
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        warn!(error = %err, "Malformed multipart request");
        Self {
            status: err.status(),
            detail: err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_table() {
        assert_eq!(status_for(ErrorKind::BadInput), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(ErrorKind::ModelUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(ErrorKind::ModelOutputInvalid),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_for(ErrorKind::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn process_error_keeps_detail() {
        let api: ApiError = ProcessError::BadInput("no content provided".into()).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.detail, "no content provided");
    }
}
