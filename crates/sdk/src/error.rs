//! SDK Error Types

use reqwest::StatusCode;
use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Missing credential: API key is empty or unset")]
    MissingCredential,

    #[error("Invalid task spec: {0}")]
    InvalidSpec(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed ({status}): {message}")]
    Authentication { status: u16, message: String },

    #[error("Task rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Response did not contain a task id")]
    MissingId,
}

impl SdkError {
    /// Classify a non-success HTTP status and its (already extracted) message.
    pub(crate) fn from_status(status: StatusCode, message: String) -> Self {
        let code = status.as_u16();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SdkError::Authentication {
                status: code,
                message,
            },
            StatusCode::TOO_MANY_REQUESTS => SdkError::RateLimited { message },
            StatusCode::BAD_REQUEST
            | StatusCode::NOT_FOUND
            | StatusCode::CONFLICT
            | StatusCode::UNPROCESSABLE_ENTITY => SdkError::Rejected {
                status: code,
                message,
            },
            _ => SdkError::Server {
                status: code,
                message,
            },
        }
    }

    /// HTTP status reported by the service, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Authentication { status, .. }
            | SdkError::Rejected { status, .. }
            | SdkError::Server { status, .. } => Some(*status),
            SdkError::RateLimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
            _ => None,
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    ///
    /// The client never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SdkError::Transport(_) | SdkError::RateLimited { .. } | SdkError::Server { .. }
        )
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SdkError::Transport(format!("Request timed out: {}", e))
        } else if e.is_connect() {
            SdkError::Transport(format!("Connection failed: {}", e))
        } else if e.is_decode() {
            SdkError::Decode(e.to_string())
        } else if e.is_builder() {
            SdkError::Config(e.to_string())
        } else {
            SdkError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Decode(e.to_string())
    }
}
