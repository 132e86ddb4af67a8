use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use assetkv_core::KvError;
use assetkv_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Cannot {method}() with assets namespace")]
    MethodNotAllowed { method: String },

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Kv(#[from] KvError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn method_not_allowed(method: &str) -> Self {
        Self::MethodNotAllowed {
            method: method.to_ascii_lowercase(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Kv(KvError::InvalidLimit { .. }) => StatusCode::BAD_REQUEST,
            Self::Kv(KvError::KeyTooLong { .. }) => StatusCode::URI_TOO_LONG,
            Self::Kv(KvError::Store(e)) | Self::Store(e) => store_status(e),
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn store_status(error: &StoreError) -> StatusCode {
    match error {
        StoreError::InvalidPath { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
