#![deny(missing_docs)]
//! Ollama streaming chat backend for askpane.
//!
//! Implements [`askpane_types::ChatBackend`] against Ollama's `/api/chat`
//! endpoint with `stream: true`. Ollama runs models locally, so there are
//! no auth headers and no rate limiting; the only wire format is NDJSON
//! (one JSON object per line) over a chunked HTTP response.

mod client;
mod error;
mod streaming;
mod types;

pub use client::Ollama;
