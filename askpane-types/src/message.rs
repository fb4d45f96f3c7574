//! Panel messages and the display seam.
//!
//! These types are the wire format of the postMessage-style boundary between
//! the coordinator and the panel UI. Inbound requests use the `command` tag
//! values `"chat"` and `"stop"`; outbound notifications use camelCase tags.

use serde::{Deserialize, Serialize};

/// A state-change notification from the coordinator to the panel.
///
/// Notifications are fire-and-forget: the coordinator never waits for the
/// panel to acknowledge one, and none is redelivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelNotification {
    /// A prompt was accepted; the panel should show a placeholder.
    Loading,
    /// Streaming has started; the panel should disable further submission.
    Responding,
    /// Replace the displayed response text.
    ///
    /// `text` is always the full accumulated response so far, not a delta.
    /// Each notification overwrites the previous one at the panel.
    ChatResponse {
        /// Full accumulated response text.
        text: String,
    },
    /// The request finished (success, error, or cancellation); the panel
    /// should re-enable submission.
    DoneResponding,
}

/// A request from the panel to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum PanelRequest {
    /// Submit a prompt for a streaming response.
    #[serde(rename = "chat")]
    Submit {
        /// The user's prompt text.
        text: String,
    },
    /// Request cancellation of the in-flight response, if any.
    #[serde(rename = "stop")]
    Cancel,
}

/// Receives coordinator notifications and renders them.
///
/// Implementations must not block: `notify` is called from inside the
/// streaming loop. The bundled channel sink in the `askpane` crate forwards
/// into an unbounded channel; tests use a recording sink.
pub trait DisplaySink: Send + Sync {
    /// Deliver one notification. Delivery is at-most-once; failures are
    /// the implementation's to swallow.
    fn notify(&self, note: PanelNotification);
}

impl<S: DisplaySink + ?Sized> DisplaySink for std::sync::Arc<S> {
    fn notify(&self, note: PanelNotification) {
        (**self).notify(note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_response_serializes_with_command_tag() {
        let note = PanelNotification::ChatResponse {
            text: "Hello".into(),
        };
        let json = serde_json::to_value(&note).expect("serialize");
        assert_eq!(json["command"], "chatResponse");
        assert_eq!(json["text"], "Hello");
    }

    #[test]
    fn payloadless_notifications_serialize_to_bare_commands() {
        for (note, tag) in [
            (PanelNotification::Loading, "loading"),
            (PanelNotification::Responding, "responding"),
            (PanelNotification::DoneResponding, "doneResponding"),
        ] {
            let json = serde_json::to_value(&note).expect("serialize");
            assert_eq!(json["command"], tag);
        }
    }

    #[test]
    fn submit_request_roundtrips() {
        let req: PanelRequest =
            serde_json::from_str(r#"{"command":"chat","text":"What is Rust?"}"#).expect("parse");
        assert_eq!(
            req,
            PanelRequest::Submit {
                text: "What is Rust?".into()
            }
        );
    }

    #[test]
    fn cancel_request_parses_from_stop_command() {
        let req: PanelRequest = serde_json::from_str(r#"{"command":"stop"}"#).expect("parse");
        assert_eq!(req, PanelRequest::Cancel);
    }
}
