//! Error types shared across askpane crates.

use std::time::Duration;

/// Errors from the chat backend.
///
/// The coordinator collapses every variant into a single display path (the
/// stringified error shown in place of the response), so the taxonomy here
/// exists for logging and for backend-level tests, not for recovery logic.
/// Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Network-level error (connection refused, reset, DNS failure).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Request timed out at the transport layer.
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    /// Requested model does not exist on the backend.
    #[error("model not found: {0}")]
    ModelNotFound(String),
    /// Malformed or invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Backend service is unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Failure while consuming the response stream.
    #[error("stream error: {0}")]
    Stream(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_error_displays_message() {
        let err = BackendError::Stream("boom".into());
        assert_eq!(err.to_string(), "stream error: boom");
    }

    #[test]
    fn model_not_found_displays_model() {
        let err = BackendError::ModelNotFound("deepseek-r1:14b".into());
        assert_eq!(err.to_string(), "model not found: deepseek-r1:14b");
    }
}
