//! HTTP mapping for crate errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::repository::VoteError;

/// JSON body returned for rejected requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind
    pub error: String,
    /// Human-readable description
    pub message: String,
}

impl Error {
    /// HTTP status and error kind for this error
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Vote(VoteError::PollNotFound(_)) | Error::NotFound(_) => {
                (StatusCode::NOT_FOUND, "POLL_NOT_FOUND")
            }
            Error::Vote(VoteError::PollExpired(_)) => (StatusCode::BAD_REQUEST, "POLL_EXPIRED"),
            Error::Vote(VoteError::OptionNotFound { .. }) => {
                (StatusCode::BAD_REQUEST, "OPTION_NOT_FOUND")
            }
            Error::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            Error::Json(_) | Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, kind) = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            error: kind.to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
