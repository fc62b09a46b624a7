// Error types for vision-relay

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("{message}")]
    TooManyRequests {
        message: String,
        retry_after: Option<u64>,
    },

    #[error("{0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Body of every error response: `{ "error": "<message>" }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Unauthorized => StatusCode::UNAUTHORIZED,
            RelayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Convert RelayError to HTTP responses for Axum
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let retry_after = match &self {
            RelayError::TooManyRequests { retry_after, .. } => *retry_after,
            _ => None,
        };

        let body = ErrorBody {
            error: self.to_string(),
        };
        let mut response = (status, axum::Json(body)).into_response();

        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
