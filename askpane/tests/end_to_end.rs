//! Full-stack test: coordinator + Ollama backend against a mock server.

use std::sync::Arc;

use askpane::{Coordinator, SubmitOutcome};
use askpane_provider_ollama::Ollama;
use askpane_types::PanelNotification;
use askpane_types::test_utils::RecordingSink;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn streams_an_ollama_response_into_the_sink() {
    let mock_server = MockServer::start().await;

    let body = concat!(
        "{\"model\":\"deepseek-r1:14b\",\"message\":{\"role\":\"assistant\",\"content\":\"Hel\"},\"done\":false}\n",
        "{\"model\":\"deepseek-r1:14b\",\"message\":{\"role\":\"assistant\",\"content\":\"lo\"},\"done\":false}\n",
        "{\"model\":\"deepseek-r1:14b\",\"message\":{\"role\":\"assistant\",\"content\":\"\"},\"done\":true,\"done_reason\":\"stop\"}\n",
    );
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(serde_json::json!({
            "messages": [{"role": "user", "content": "Say hello"}],
            "stream": true,
            "keep_alive": "10m",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = Ollama::new().base_url(mock_server.uri());
    let sink = Arc::new(RecordingSink::new());
    let coordinator = Coordinator::new(backend, sink.clone());

    let outcome = coordinator.submit("Say hello").await;

    assert_eq!(outcome, SubmitOutcome::Accepted);
    assert_eq!(
        sink.notifications(),
        vec![
            PanelNotification::Loading,
            PanelNotification::Responding,
            PanelNotification::ChatResponse { text: "Hel".into() },
            PanelNotification::ChatResponse {
                text: "Hello".into()
            },
            PanelNotification::DoneResponding,
        ]
    );
}

#[tokio::test]
async fn backend_refusal_surfaces_as_response_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model 'missing' not found"))
        .mount(&mock_server)
        .await;

    let backend = Ollama::new().base_url(mock_server.uri());
    let sink = Arc::new(RecordingSink::new());
    let coordinator = Coordinator::new(backend, sink.clone());

    coordinator.submit("hi").await;

    assert_eq!(
        sink.last_chat_response(),
        Some("model not found: model 'missing' not found".into())
    );
    assert_eq!(
        sink.notifications().last(),
        Some(&PanelNotification::DoneResponding)
    );
}
