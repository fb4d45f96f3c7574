//! The backend seam: streaming chat completion.
//!
//! [`ChatBackend`] uses RPITIT (return-position `impl Trait` in traits) and
//! is intentionally not object-safe; the coordinator is generic over it.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::BackendError;
use crate::stream::ChatStream;

/// A single-turn streaming chat request.
///
/// The prompt is sent as the sole user message; no conversation history is
/// carried across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// Model identifier (e.g. `"deepseek-r1:14b"`). Backends may substitute
    /// their own default when empty.
    pub model: String,
    /// The user's prompt text.
    pub prompt: String,
    /// How long the backend should keep the model resident after the
    /// request (e.g. `"10m"`, `"0"` to unload). Omitted from the wire when
    /// `None`.
    pub keep_alive: Option<String>,
}

/// A chat-completion service that streams incremental text fragments.
///
/// `cancel` is the abort channel for the returned stream: backends must
/// observe it between fragments and terminate the sequence early once it is
/// cancelled. Cancellation is cooperative — a fragment already in flight may
/// still be delivered — and must never surface as a panic or a hang.
pub trait ChatBackend: Send + Sync {
    /// Open a streaming chat call for `request`.
    ///
    /// Errors returned here cover request setup (connection, HTTP status);
    /// failures mid-stream arrive as [`crate::ChatEvent::Error`] instead.
    fn chat(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<ChatStream, BackendError>> + Send;
}

impl<B: ChatBackend> ChatBackend for std::sync::Arc<B> {
    fn chat(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<ChatStream, BackendError>> + Send {
        (**self).chat(request, cancel)
    }
}
