//! Streaming types for incremental chat responses.

use std::pin::Pin;

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::BackendError;

/// An event emitted while a chat response streams in.
#[derive(Debug)]
pub enum ChatEvent {
    /// One incremental piece of generated text, in production order.
    Fragment(String),
    /// The backend marked the response complete.
    Done {
        /// Why generation stopped (e.g. `"stop"`), when the backend says.
        reason: Option<String>,
    },
    /// A failure while consuming the stream. The stream ends after this.
    Error(BackendError),
}

/// Handle to one in-flight streaming chat response.
///
/// The fragment sequence is lazy, finite, order-preserving, and not
/// restartable. [`ChatStream::abort`] requests early termination; it is
/// best-effort and may race with natural completion, in which case it has
/// no effect. Dropping the handle tears the connection down as well.
pub struct ChatStream {
    events: Pin<Box<dyn Stream<Item = ChatEvent> + Send>>,
    abort: CancellationToken,
}

impl ChatStream {
    /// Wrap an event stream together with its abort token.
    ///
    /// Backends construct this with the cancellation token the caller passed
    /// into [`crate::ChatBackend::chat`], so that both the caller's token and
    /// this handle's `abort` reach the same underlying connection.
    pub fn new(
        events: impl Stream<Item = ChatEvent> + Send + 'static,
        abort: CancellationToken,
    ) -> Self {
        Self {
            events: Box::pin(events),
            abort,
        }
    }

    /// Await the next event, or `None` once the stream has ended.
    pub async fn next_event(&mut self) -> Option<ChatEvent> {
        self.events.next().await
    }

    /// Request early termination of the stream.
    ///
    /// Idempotent. Safe to call after the stream has already completed.
    pub fn abort(&self) {
        self.abort.cancel();
    }
}

impl std::fmt::Debug for ChatStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStream")
            .field("aborted", &self.abort.is_cancelled())
            .finish_non_exhaustive()
    }
}
