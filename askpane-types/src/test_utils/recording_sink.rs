//! RecordingSink — records every notification for inspection in tests.

use std::sync::Mutex;

use tokio::sync::watch;

use crate::message::{DisplaySink, PanelNotification};

/// A [`DisplaySink`] that records notifications and lets tests await them.
///
/// Use [`RecordingSink::notifications`] for post-hoc assertions and
/// [`RecordingSink::wait_for`] to synchronize with a coordinator running on
/// another task.
#[derive(Debug)]
pub struct RecordingSink {
    notes: Mutex<Vec<PanelNotification>>,
    version: watch::Sender<u64>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self {
            notes: Mutex::new(Vec::new()),
            version: watch::channel(0).0,
        }
    }

    /// Snapshot of all notifications recorded so far, in delivery order.
    pub fn notifications(&self) -> Vec<PanelNotification> {
        self.notes.lock().unwrap().clone()
    }

    /// The text of the most recent `ChatResponse` notification, if any.
    pub fn last_chat_response(&self) -> Option<String> {
        self.notes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|note| match note {
                PanelNotification::ChatResponse { text } => Some(text.clone()),
                _ => None,
            })
    }

    /// Wait until `pred` holds over the recorded notifications.
    pub async fn wait_for(&self, pred: impl Fn(&[PanelNotification]) -> bool) {
        let mut rx = self.version.subscribe();
        loop {
            if pred(&self.notes.lock().unwrap()) {
                return;
            }
            // Sender lives in self, so changed() cannot fail while we loop.
            let _ = rx.changed().await;
        }
    }

    /// Wait until a `ChatResponse` with exactly `text` has been recorded.
    pub async fn wait_for_chat_response(&self, text: &str) {
        self.wait_for(|notes| {
            notes.iter().any(|note| {
                matches!(note, PanelNotification::ChatResponse { text: t } if t == text)
            })
        })
        .await;
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for RecordingSink {
    fn notify(&self, note: PanelNotification) {
        self.notes.lock().unwrap().push(note);
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_delivery_order() {
        let sink = RecordingSink::new();
        sink.notify(PanelNotification::Loading);
        sink.notify(PanelNotification::Responding);

        assert_eq!(
            sink.notifications(),
            vec![PanelNotification::Loading, PanelNotification::Responding]
        );
    }

    #[test]
    fn last_chat_response_returns_latest_text() {
        let sink = RecordingSink::new();
        assert_eq!(sink.last_chat_response(), None);

        sink.notify(PanelNotification::ChatResponse { text: "Hel".into() });
        sink.notify(PanelNotification::ChatResponse {
            text: "Hello".into(),
        });
        sink.notify(PanelNotification::DoneResponding);

        assert_eq!(sink.last_chat_response(), Some("Hello".into()));
    }

    #[tokio::test]
    async fn wait_for_observes_notifications_from_another_task() {
        let sink = std::sync::Arc::new(RecordingSink::new());
        let writer = sink.clone();
        let task = tokio::spawn(async move {
            writer.notify(PanelNotification::ChatResponse { text: "hi".into() });
        });

        sink.wait_for_chat_response("hi").await;
        task.await.expect("writer task");
    }
}
