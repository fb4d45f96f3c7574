//! The request coordinator: single-flight streaming with cooperative stop.

use std::sync::Mutex;

use askpane_types::{
    BackendError, ChatBackend, ChatEvent, ChatRequest, DisplaySink, PanelNotification,
};
use tokio_util::sync::CancellationToken;

/// Model identity used when none is configured. One backend identity is
/// hardcoded per deployment; there is no fallback chain.
const DEFAULT_MODEL: &str = "deepseek-r1:14b";

/// Default model memory residency requested from the backend.
const DEFAULT_KEEP_ALIVE: &str = "10m";

/// Result of a [`Coordinator::submit`] call.
///
/// Rejections are silent at the sink — no notification, no error — but
/// explicit here so callers and tests can observe them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum SubmitOutcome {
    /// The prompt was accepted; the request ran to termination (success,
    /// error, or cancellation) before this was returned.
    Accepted,
    /// A request was already in flight. The prompt was dropped, not queued.
    Busy,
    /// The prompt was empty. Nothing was submitted.
    EmptyPrompt,
}

/// Lifecycle state of the single in-flight request.
///
/// `ongoing` gates submission; `cancel` is the stop channel for the current
/// request and is replaced with a fresh token exactly when `ongoing` goes
/// back to false, so every request starts from a clean cancellation state.
#[derive(Debug)]
struct RequestState {
    ongoing: bool,
    cancel: CancellationToken,
}

/// Owns the single-request lifecycle between a chat backend and a display
/// sink.
///
/// One coordinator serves one panel. The state is owned by the instance, so
/// multiple panels can each run an independent coordinator. All mutation
/// happens under a short-lived lock; the streaming loop itself runs
/// lock-free and observes cancellation through the token it passed to the
/// backend.
///
/// # Example
///
/// ```no_run
/// use askpane::Coordinator;
/// use askpane_provider_ollama::Ollama;
/// # use askpane_types::{DisplaySink, PanelNotification};
/// # struct Stdout;
/// # impl DisplaySink for Stdout {
/// #     fn notify(&self, _note: PanelNotification) {}
/// # }
///
/// # async fn run() {
/// let coordinator = Coordinator::new(Ollama::new(), Stdout)
///     .model("deepseek-r1:14b")
///     .keep_alive("10m");
/// let _outcome = coordinator.submit("What is Rust?").await;
/// # }
/// ```
pub struct Coordinator<B, S> {
    backend: B,
    sink: S,
    model: String,
    keep_alive: Option<String>,
    state: Mutex<RequestState>,
}

impl<B, S> Coordinator<B, S>
where
    B: ChatBackend,
    S: DisplaySink,
{
    /// Create a coordinator in the Idle state.
    #[must_use]
    pub fn new(backend: B, sink: S) -> Self {
        Self {
            backend,
            sink,
            model: DEFAULT_MODEL.into(),
            keep_alive: Some(DEFAULT_KEEP_ALIVE.into()),
            state: Mutex::new(RequestState {
                ongoing: false,
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Override the model identifier sent with every request.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the keep_alive duration sent with every request.
    #[must_use]
    pub fn keep_alive(mut self, duration: impl Into<String>) -> Self {
        self.keep_alive = Some(duration.into());
        self
    }

    /// Whether a request is currently streaming.
    pub fn is_ongoing(&self) -> bool {
        self.state.lock().unwrap().ongoing
    }

    /// Submit a prompt and drive the response to termination.
    ///
    /// Rejected when a request is already in flight or the prompt is empty;
    /// both rejections are no-ops with no sink notification. On acceptance
    /// the sink sees `Loading`, `Responding`, a `ChatResponse` per fragment
    /// carrying the full accumulated text, and — on every termination path —
    /// a final `DoneResponding` before the coordinator returns to Idle.
    pub async fn submit(&self, prompt: &str) -> SubmitOutcome {
        if prompt.is_empty() {
            tracing::debug!("submit rejected: empty prompt");
            return SubmitOutcome::EmptyPrompt;
        }

        let cancel = {
            let mut state = self.state.lock().unwrap();
            if state.ongoing {
                tracing::debug!("submit rejected: request already in flight");
                return SubmitOutcome::Busy;
            }
            state.ongoing = true;
            state.cancel.clone()
        };

        tracing::debug!(model = %self.model, "prompt accepted");
        self.sink.notify(PanelNotification::Loading);
        self.sink.notify(PanelNotification::Responding);

        self.relay_response(prompt, &cancel).await;

        // Cleanup runs on every path out of the relay: re-enable the panel
        // first, then release the gate with a fresh token.
        self.sink.notify(PanelNotification::DoneResponding);
        let mut state = self.state.lock().unwrap();
        state.ongoing = false;
        state.cancel = CancellationToken::new();

        SubmitOutcome::Accepted
    }

    /// Request cancellation of the in-flight response.
    ///
    /// A no-op when idle. Cancellation is cooperative: the streaming loop
    /// observes the token between fragments, so at most one extra fragment
    /// may still reach the sink. This never notifies the sink and never
    /// transitions state by itself.
    pub fn cancel(&self) {
        let state = self.state.lock().unwrap();
        if state.ongoing {
            tracing::debug!("stop requested for in-flight response");
            state.cancel.cancel();
        }
    }

    /// Open the stream and relay fragments until it terminates.
    ///
    /// Handles its own failures so the caller's cleanup always runs.
    async fn relay_response(&self, prompt: &str, cancel: &CancellationToken) {
        let request = ChatRequest {
            model: self.model.clone(),
            prompt: prompt.into(),
            keep_alive: self.keep_alive.clone(),
        };

        let mut stream = match self.backend.chat(request, cancel.clone()).await {
            Ok(stream) => stream,
            Err(err) => {
                self.show_failure(err, cancel);
                return;
            }
        };

        let mut text = String::new();
        while let Some(event) = stream.next_event().await {
            match event {
                ChatEvent::Fragment(fragment) => {
                    text.push_str(&fragment);
                    self.sink.notify(PanelNotification::ChatResponse {
                        text: text.clone(),
                    });
                    // Cooperative stop: observed after each fragment. The
                    // abort may race with natural completion; both end the
                    // stream.
                    if cancel.is_cancelled() {
                        stream.abort();
                    }
                }
                ChatEvent::Done { reason } => {
                    tracing::debug!(reason = ?reason, "response complete");
                    break;
                }
                ChatEvent::Error(err) => {
                    self.show_failure(err, cancel);
                    break;
                }
            }
        }
    }

    /// Surface a backend failure as the replacing response text, unless a
    /// stop was already requested — then the failure is the expected result
    /// of the abort and is swallowed.
    fn show_failure(&self, err: BackendError, cancel: &CancellationToken) {
        if cancel.is_cancelled() {
            tracing::debug!(error = %err, "stream failed after stop request; suppressed");
            return;
        }
        tracing::warn!(error = %err, "chat request failed");
        self.sink.notify(PanelNotification::ChatResponse {
            text: err.to_string(),
        });
    }
}
