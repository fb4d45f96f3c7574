//! Message-passing endpoint between a panel UI and the coordinator.
//!
//! The transport is postMessage-style: the UI pushes [`PanelRequest`]s into
//! a channel and receives [`PanelNotification`]s out of another. Delivery is
//! at-most-once in both directions — a closed peer is ignored, nothing is
//! redelivered.

use std::sync::Arc;

use askpane_types::{ChatBackend, DisplaySink, PanelNotification, PanelRequest};
use tokio::sync::mpsc;

use crate::coordinator::Coordinator;

/// A [`DisplaySink`] that forwards notifications into an unbounded channel.
///
/// The receiving half belongs to the UI layer. When the receiver is gone
/// the send fails silently, matching the at-most-once contract.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<PanelNotification>,
}

impl ChannelSink {
    /// Create a sink and the receiver the UI drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PanelNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DisplaySink for ChannelSink {
    fn notify(&self, note: PanelNotification) {
        // Panel may already be closed; dropped notifications are fine.
        let _ = self.tx.send(note);
    }
}

/// Dispatch panel requests to the coordinator until the channel closes.
///
/// `Submit` is spawned onto its own task so a later `Cancel` can be
/// dispatched while the response is still streaming; the coordinator's
/// single-flight gate makes concurrent submissions safe (the extras are
/// rejected, not queued). Rejected outcomes are logged, never surfaced —
/// the panel shows nothing for a dropped submission.
pub async fn run_panel<B, S>(
    coordinator: Arc<Coordinator<B, S>>,
    mut requests: mpsc::UnboundedReceiver<PanelRequest>,
) where
    B: ChatBackend + 'static,
    S: DisplaySink + 'static,
{
    while let Some(request) = requests.recv().await {
        match request {
            PanelRequest::Submit { text } => {
                let coordinator = coordinator.clone();
                tokio::spawn(async move {
                    let outcome = coordinator.submit(&text).await;
                    tracing::debug!(?outcome, "submit dispatched");
                });
            }
            PanelRequest::Cancel => coordinator.cancel(),
        }
    }
    tracing::debug!("panel request channel closed");
}
