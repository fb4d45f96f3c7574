#![deny(missing_docs)]
//! # askpane-types — shared types for the askpane chat panel
//!
//! This crate defines the two seams of the panel system and the types that
//! cross them:
//!
//! | Seam | Trait | What it does |
//! |------|-------|-------------|
//! | Backend | [`ChatBackend`] | Streaming chat completion from a model service |
//! | Display | [`DisplaySink`] | Fire-and-forget state notifications to the UI |
//!
//! The request coordinator (in the `askpane` crate) sits between the two:
//! it opens one [`ChatStream`] per accepted prompt, relays fragments to the
//! sink as accumulated text, and honors cooperative cancellation through the
//! [`tokio_util::sync::CancellationToken`] it passes into the backend call.
//!
//! Panel messages ([`PanelRequest`], [`PanelNotification`]) are serde types
//! because they cross a postMessage-style UI boundary; delivery is assumed
//! at-most-once on both sides.

pub mod backend;
pub mod error;
pub mod message;
pub mod stream;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use backend::{ChatBackend, ChatRequest};
pub use error::BackendError;
pub use message::{DisplaySink, PanelNotification, PanelRequest};
pub use stream::{ChatEvent, ChatStream};
