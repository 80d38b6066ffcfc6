use std::path::PathBuf;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Cannot read directory {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Track listing request failed: {0}")]
    Request(String),
    #[error("Discovery task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Invalid track path: {0}")]
    InvalidPath(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Track request failed: {0}")]
    Request(String),
    #[error("Track server answered with status {0}")]
    Status(u16),
    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("Upload not implemented yet")]
    NotImplemented,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Parse(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Discovery(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Fetch(err) => match err {
                FetchError::NotFound(_) => StatusCode::NOT_FOUND,
                FetchError::InvalidPath(_) => StatusCode::BAD_REQUEST,
                FetchError::NotImplemented => StatusCode::NOT_IMPLEMENTED,
                FetchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                FetchError::Io(_) | FetchError::Request(_) | FetchError::Status(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
