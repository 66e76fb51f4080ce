//! Error types for backend fetches.

use thiserror::Error;

/// Errors that can occur when fetching from the SysMonitor backend.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request could not be sent or the connection failed.
    #[error("Network failure: {0}")]
    Network(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Backend answered with a non-success status.
    #[error("Backend returned status {0}")]
    Status(u16),

    /// Response body did not match the expected payload.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The action needs an endpoint that is not configured.
    #[error("No {0} configured")]
    NotConfigured(&'static str),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::MalformedPayload(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedPayload(err.to_string())
    }
}
