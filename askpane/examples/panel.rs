//! Run the panel loop against a local Ollama instance.
//!
//! Make sure Ollama is running locally and run:
//!   cargo run --example panel -- "Say hello in one sentence."

use std::sync::Arc;

use askpane::{ChannelSink, Coordinator, run_panel};
use askpane_provider_ollama::Ollama;
use askpane_types::{PanelNotification, PanelRequest};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Say hello in one sentence.".to_string());

    let (sink, mut notifications) = ChannelSink::new();
    let coordinator = Arc::new(Coordinator::new(Ollama::new(), sink));

    let (requests_tx, requests_rx) = mpsc::unbounded_channel();
    let panel = tokio::spawn(run_panel(coordinator, requests_rx));

    requests_tx
        .send(PanelRequest::Submit { text: prompt })
        .expect("panel loop is running");

    // A real panel overwrites its response area on every notification;
    // stdout appends, so print status lines and the final text only.
    let mut last_text = String::new();
    while let Some(note) = notifications.recv().await {
        match note {
            PanelNotification::Loading => println!("Loading..."),
            PanelNotification::Responding => println!("Responding..."),
            PanelNotification::ChatResponse { text } => last_text = text,
            PanelNotification::DoneResponding => break,
        }
    }
    println!("{last_text}");

    drop(requests_tx);
    panel.await.expect("panel loop exits when channel closes");
}
