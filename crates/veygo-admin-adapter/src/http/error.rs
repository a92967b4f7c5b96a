/*
[INPUT]:  Error sources (HTTP, API status, serialization, persistence, queue)
[OUTPUT]: Structured error types with retry hints and credential outcomes
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

use crate::auth::Outcome;

/// Main error type for the Veygo admin adapter
#[derive(Error, Debug)]
pub enum VeygoError {
    /// HTTP request failed before a verdict arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Session rejected (401)
    #[error("Session expired, please log in again")]
    Unauthorized,

    /// Authenticated but not allowed (403)
    #[error("Access denied for this account, please log in again")]
    Forbidden,

    /// No active session; the request was not sent
    #[error("Not logged in")]
    NotAuthenticated,

    /// Wrong email or password on login (401 from the login endpoint)
    #[error("Invalid email or password")]
    InvalidLogin,

    /// Status code the endpoint does not document
    #[error("Unexpected status code {code}")]
    UnexpectedStatus { code: u16 },

    /// Response is not `application/json`
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential storage failed
    #[error("Credential persistence failed: {0}")]
    Persistence(#[from] std::io::Error),

    /// Task finished without reporting a result (it panicked)
    #[error("API task aborted before completing")]
    TaskAborted,
}

impl VeygoError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            VeygoError::Http(err) => err.is_timeout() || err.is_connect(),
            VeygoError::UnexpectedStatus { code } => *code >= 500,
            _ => false,
        }
    }

    /// Check if error indicates the session is no longer valid
    pub fn is_auth_error(&self) -> bool {
        matches!(self, VeygoError::Unauthorized | VeygoError::Forbidden)
    }

    /// Credential outcome a task should report for this failure.
    ///
    /// Session rejections clear the credential; every other failure leaves it
    /// alone.
    pub fn outcome(&self) -> Outcome {
        if self.is_auth_error() {
            Outcome::ClearCredential
        } else {
            Outcome::NoOp
        }
    }

    /// Error for a status the endpoint does not treat as success.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => VeygoError::Unauthorized,
            StatusCode::FORBIDDEN => VeygoError::Forbidden,
            _ => VeygoError::UnexpectedStatus {
                code: status.as_u16(),
            },
        }
    }
}

/// Result type alias for Veygo operations
pub type Result<T> = std::result::Result<T, VeygoError>;
