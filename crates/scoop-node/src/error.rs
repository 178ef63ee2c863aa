//! API error type and its mapping to HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use scoop_store::StoreError;
use thiserror::Error;

use crate::routing::RoutingError;

/// Errors returned by request handlers.
///
/// Every error is answered with a bare status code and an empty body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The path names a record that cannot exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request did not resolve to a handler.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// Error from the content store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Wraps a store error that must be answered with 400, even when it
    /// reports a missing record.
    pub fn rejected(err: StoreError) -> Self {
        ApiError::BadRequest(err.to_string())
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Routing(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = %status, error = %self, "returning error to client");
        status.into_response()
    }
}
