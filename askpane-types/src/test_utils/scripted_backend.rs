//! ScriptedBackend — replays a scripted event sequence per chat call.

use std::collections::VecDeque;
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

use crate::backend::{ChatBackend, ChatRequest};
use crate::error::BackendError;
use crate::stream::{ChatEvent, ChatStream};

/// One step of a scripted stream.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Yield one text fragment.
    Fragment(String),
    /// Yield a stream error and end the stream.
    Fail(String),
    /// Park until the stream is aborted, then raise a stream error — the
    /// shape a torn-down connection produces when cancellation wins the
    /// race against natural completion.
    WaitForAbort,
}

/// A [`ChatBackend`] that replays pre-scripted streams.
///
/// Each call to `chat` consumes the next script in FIFO order (an exhausted
/// backend serves an empty stream) and records the request for inspection
/// with [`ScriptedBackend::requests`].
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    scripts: Mutex<VecDeque<Vec<ScriptStep>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    /// Create a backend with no scripts queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one scripted stream, consumed by the next `chat` call.
    #[must_use]
    pub fn with_stream(self, steps: Vec<ScriptStep>) -> Self {
        self.scripts.lock().unwrap().push_back(steps);
        self
    }

    /// Queue a stream that yields the given fragments and completes.
    #[must_use]
    pub fn with_fragments(self, fragments: &[&str]) -> Self {
        self.with_stream(
            fragments
                .iter()
                .map(|f| ScriptStep::Fragment((*f).to_string()))
                .collect(),
        )
    }

    /// Snapshot of every request received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ChatBackend for ScriptedBackend {
    async fn chat(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> Result<ChatStream, BackendError> {
        self.requests.lock().unwrap().push(request);
        let steps = self.scripts.lock().unwrap().pop_front().unwrap_or_default();

        let abort = cancel.clone();
        let events = async_stream::stream! {
            for step in steps {
                match step {
                    ScriptStep::Fragment(text) => yield ChatEvent::Fragment(text),
                    ScriptStep::Fail(msg) => {
                        yield ChatEvent::Error(BackendError::Stream(msg));
                        return;
                    }
                    ScriptStep::WaitForAbort => {
                        abort.cancelled().await;
                        yield ChatEvent::Error(BackendError::Stream(
                            "request aborted".into(),
                        ));
                        return;
                    }
                }
            }
            yield ChatEvent::Done {
                reason: Some("stop".into()),
            };
        };

        Ok(ChatStream::new(events, cancel))
    }
}
