//! Error taxonomy for the relay
//!
//! Request-time failures map onto an HTTP status; startup failures
//! (`Profile`, `Config`) abort the process before the listener binds.

use hyper::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Request body is not a valid chat request
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Backend could not be reached (connection refused, timeout)
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Backend answered with a failure status or an unreadable envelope
    #[error("backend error: {0}")]
    BackendError(String),

    #[error("invalid prompt profile: {0}")]
    Profile(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl RelayError {
    /// HTTP status returned to the client for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BackendError(_) => StatusCode::BAD_GATEWAY,
            Self::Profile(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::BackendUnavailable(err.to_string())
        } else {
            Self::BackendError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedRequest(err.to_string())
    }
}
