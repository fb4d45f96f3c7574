//! Ollama API client struct and builder.

use std::future::Future;

use askpane_types::{BackendError, ChatBackend, ChatRequest, ChatStream};
use tokio_util::sync::CancellationToken;

use crate::error::{map_http_status, map_reqwest_error};
use crate::streaming::stream_chat;
use crate::types::{OllamaChatRequest, OllamaMessage};

/// Default model used when the request does not specify one.
const DEFAULT_MODEL: &str = "deepseek-r1:14b";

/// Default Ollama API base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Client for the Ollama Chat API.
///
/// Implements [`ChatBackend`] for use anywhere the panel accepts a backend.
///
/// # Example
///
/// ```no_run
/// use askpane_provider_ollama::Ollama;
///
/// let backend = Ollama::new()
///     .model("deepseek-r1:14b")
///     .base_url("http://localhost:11434")
///     .keep_alive("10m");
/// ```
pub struct Ollama {
    /// Default model identifier used when the request does not specify one.
    pub(crate) model: String,
    /// API base URL (override for testing or remote Ollama instances).
    pub(crate) base_url: String,
    /// Default keep_alive duration string (e.g. "10m", "0" to unload).
    pub(crate) keep_alive: Option<String>,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl Ollama {
    /// Create a new client with sensible defaults.
    ///
    /// Default model: `deepseek-r1:14b`.
    /// Default base URL: `http://localhost:11434`.
    /// No authentication required (Ollama is local).
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            keep_alive: None,
            client: reqwest::Client::new(),
        }
    }

    /// Override the default model.
    ///
    /// This is used when [`ChatRequest::model`] is empty.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing with a local mock server or a remote Ollama
    /// instance.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the default keep_alive duration for model memory residency.
    ///
    /// Examples: `"10m"` (keep for 10 minutes), `"0"` (unload immediately).
    /// Used when [`ChatRequest::keep_alive`] is unset; when neither is set,
    /// Ollama applies its server default.
    #[must_use]
    pub fn keep_alive(mut self, duration: impl Into<String>) -> Self {
        self.keep_alive = Some(duration.into());
        self
    }

    /// Build the chat endpoint URL.
    pub(crate) fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn build_body(&self, request: &ChatRequest) -> OllamaChatRequest {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };
        OllamaChatRequest {
            model,
            messages: vec![OllamaMessage {
                role: "user".into(),
                content: request.prompt.clone(),
            }],
            stream: true,
            keep_alive: request.keep_alive.clone().or_else(|| self.keep_alive.clone()),
        }
    }
}

impl Default for Ollama {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatBackend for Ollama {
    /// Open a streaming chat call against `/api/chat`.
    ///
    /// The prompt is sent as the sole user message with `stream: true`.
    /// HTTP-level failures are returned here; failures while the NDJSON
    /// body streams arrive as [`askpane_types::ChatEvent::Error`].
    fn chat(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<ChatStream, BackendError>> + Send {
        let url = self.chat_url();
        let body = self.build_body(&request);
        let http_client = self.client.clone();

        async move {
            tracing::debug!(url = %url, model = %body.model, "sending streaming chat request to Ollama");

            let response = http_client
                .post(&url)
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            if !status.is_success() {
                let body_text = response.text().await.map_err(map_reqwest_error)?;
                return Err(map_http_status(status, &body_text));
            }

            Ok(stream_chat(response, cancel))
        }
    }
}
