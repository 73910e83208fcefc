use crate::model::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snaplink_redirector::RedirectorError;
use snaplink_shortener::ShortenerError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced to HTTP clients. The messages are fixed; internal detail
/// is logged where the failure happens and never reaches the body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid JSON in request body")]
    InvalidJson,
    #[error("URL parameter is required")]
    MissingUrl,
    #[error("Invalid URL: only http and https allowed")]
    InvalidUrl,
    #[error("Short URL not found")]
    LinkNotFound,
    #[error("Not found")]
    RouteNotFound,
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidJson | AppError::MissingUrl | AppError::InvalidUrl => {
                StatusCode::BAD_REQUEST
            }
            AppError::LinkNotFound | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        match err {
            ShortenerError::InvalidInput(_) => AppError::InvalidUrl,
            ShortenerError::StorageUnavailable(_) => AppError::Internal,
        }
    }
}

impl From<RedirectorError> for AppError {
    fn from(err: RedirectorError) -> Self {
        match err {
            RedirectorError::NotFound(_) => AppError::LinkNotFound,
            RedirectorError::StorageUnavailable(_) => AppError::Internal,
        }
    }
}
