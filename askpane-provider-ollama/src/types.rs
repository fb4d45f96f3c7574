//! Ollama `/api/chat` wire types.
//!
//! Only the streaming subset the panel needs: a single-turn request and the
//! per-line chunk objects of the NDJSON response:
//! ```text
//! {"model":"deepseek-r1:14b","message":{"role":"assistant","content":"Hel"},"done":false}
//! {"model":"deepseek-r1:14b","message":{"role":"assistant","content":"lo"},"done":false}
//! {"model":"deepseek-r1:14b","message":{"role":"assistant","content":""},"done":true,"done_reason":"stop"}
//! ```
//!
//! Reference: <https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-chat-completion>

use serde::{Deserialize, Serialize};

/// Ollama `/api/chat` request body.
#[derive(Debug, Serialize)]
pub struct OllamaChatRequest {
    /// Model identifier (e.g. "deepseek-r1:14b").
    pub model: String,
    /// Conversation messages. Always a single user message for the panel.
    pub messages: Vec<OllamaMessage>,
    /// Whether to stream the response. Always `true` for this backend.
    pub stream: bool,
    /// How long to keep the model loaded in memory (e.g. "10m", "0").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

/// A message in the Ollama `/api/chat` format.
#[derive(Debug, Serialize, Deserialize)]
pub struct OllamaMessage {
    /// Role: "system", "user", or "assistant".
    pub role: String,
    /// Message text content.
    pub content: String,
}

/// One NDJSON line of a streaming `/api/chat` response.
#[derive(Debug, Deserialize)]
pub struct OllamaChunk {
    /// The assistant message carried by this chunk.
    #[serde(default)]
    pub message: Option<OllamaMessage>,
    /// Whether this is the final chunk of the response.
    #[serde(default)]
    pub done: bool,
    /// Why generation stopped (present on the final chunk).
    #[serde(default)]
    pub done_reason: Option<String>,
}
