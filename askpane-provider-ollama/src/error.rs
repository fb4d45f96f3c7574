//! Internal error helpers for mapping HTTP/reqwest errors to [`BackendError`].

use std::time::Duration;

use askpane_types::BackendError;

/// Map an HTTP status code (from the Ollama API) to a [`BackendError`].
///
/// Reference: <https://github.com/ollama/ollama/blob/main/docs/api.md>
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> BackendError {
    match status.as_u16() {
        404 => BackendError::ModelNotFound(body.to_string()),
        400 => BackendError::InvalidRequest(body.to_string()),
        500..=599 => BackendError::ServiceUnavailable(body.to_string()),
        _ => BackendError::InvalidRequest(format!("HTTP {status}: {body}")),
    }
}

/// Map a [`reqwest::Error`] to a [`BackendError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout(Duration::from_secs(30))
    } else {
        BackendError::Network(Box::new(err))
    }
}
