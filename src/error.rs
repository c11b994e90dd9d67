use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Classified outcome of a failed forward.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForwardError {
    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    TransportFailure(String),

    #[error("Unexpected error: {0}")]
    UnexpectedFailure(String),
}

impl ForwardError {
    /// Status code surfaced to the caller for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForwardError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ForwardError::TransportFailure(_) => StatusCode::BAD_REQUEST,
            ForwardError::UnexpectedFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Forward(#[from] ForwardError),

    #[error("Missing required query parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid query string: {0}")]
    InvalidQuery(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Forward(e) => e.status_code(),
            AppError::MissingParameter(_) | AppError::InvalidQuery(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };

        let body = Json(json!({ "detail": self.to_string() }));

        (status, body).into_response()
    }
}
