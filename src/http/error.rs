//! Mapping of service outcomes to HTTP responses.

use std::fmt::Display;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::ServiceError;

/// Error type for the HTTP controllers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required precondition header was not sent.
    #[error("missing required header: {0}")]
    MissingPrecondition(&'static str),

    /// A precondition header that is not a version number.
    #[error("malformed {header} header: {value:?}")]
    MalformedPrecondition { header: &'static str, value: String },

    /// A request body that is not JSON of the expected shape.
    #[error("invalid request body: {}", .0.body_text())]
    BadBody(#[from] JsonRejection),

    /// The response headers could not be built (e.g. an invalid `Location`).
    #[error("could not build response: {0}")]
    Response(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub(crate) fn not_found(collection: &'static str, id: impl Display) -> Self {
        ApiError::Service(ServiceError::NotFound {
            collection,
            id: id.to_string(),
        })
    }

    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingPrecondition(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedPrecondition { .. } => StatusCode::BAD_REQUEST,
            ApiError::BadBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Response(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Service(err) => match err {
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::VersionConflict { .. } => StatusCode::CONFLICT,
                ServiceError::DeleteFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                ServiceError::AlreadyExists { .. } => StatusCode::CONFLICT,
                ServiceError::InsufficientStock { .. } => StatusCode::CONFLICT,
                ServiceError::Invalid(_) => StatusCode::BAD_REQUEST,
                ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Not-found and version conflicts carry no body.
        if let ApiError::Service(ServiceError::NotFound { .. } | ServiceError::VersionConflict { .. }) = self {
            return status.into_response();
        }

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
