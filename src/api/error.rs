use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the issue client and its transport.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("invalid API host `{0}`")]
    InvalidHost(String),

    #[error("invalid header `{0}`")]
    InvalidHeader(String),

    /// Request options could not be encoded into the request.
    #[error("failed to encode request options: {0}")]
    Encode(String),

    /// Network failure while sending the request or reading the body.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// The response body was not the expected JSON shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl ApiError {
    /// True when the error came from the request context rather than the server.
    pub fn is_context_error(&self) -> bool {
        matches!(self, ApiError::Cancelled | ApiError::DeadlineExceeded)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Request(err) => err.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::Encode(err.to_string())
        } else {
            ApiError::Request(err)
        }
    }
}
