//! Error responses for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Agent store unavailable")]
    Persistence,

    #[error("AI processing failed")]
    AiProcessing,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Persistence | Self::AiProcessing => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every failed response. Messages are opaque; details go to the log.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
