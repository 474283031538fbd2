use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::response::json_response;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{context}: HTTP status {status}")]
    UpstreamStatus { context: String, status: u16 },

    #[error("{0}")]
    Upstream(String),

    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed upstream payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Could not find client_id in any scripts")]
    CredentialNotFound,

    #[error("Could not find user ID in profile page")]
    UserIdNotFound,

    #[error("Credential store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, ProxyError>;

impl ProxyError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Validation(_) => StatusCode::BAD_REQUEST,
            ProxyError::NotFound(_) | ProxyError::UserIdNotFound => StatusCode::NOT_FOUND,
            ProxyError::UpstreamStatus { .. }
            | ProxyError::Upstream(_)
            | ProxyError::Http(_)
            | ProxyError::Decode(_)
            | ProxyError::CredentialNotFound
            | ProxyError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!(%status, "request failed: {message}");
        }

        json_response(status, &json!({ "error": message }))
    }
}
