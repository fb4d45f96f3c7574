#![deny(missing_docs)]
//! # askpane — chat panel request coordinator
//!
//! The coordinator owns the lifecycle of one streaming chat request at a
//! time: it accepts a prompt, relays incremental fragments to a
//! [`askpane_types::DisplaySink`] as accumulated text, and honors a
//! user-initiated stop by aborting the in-flight stream cooperatively.
//!
//! Two states only: **Idle** and **Streaming**. Submissions while streaming
//! are rejected (never queued), cancellation is advisory and observed
//! between fragments, and every termination path — success, backend error,
//! or cancellation — returns the coordinator to Idle with a fresh
//! cancellation token.
//!
//! [`panel`] provides the message-passing endpoint that bridges a UI layer
//! speaking [`askpane_types::PanelRequest`] / [`askpane_types::PanelNotification`]
//! to a coordinator instance.

pub mod coordinator;
pub mod panel;

pub use coordinator::{Coordinator, SubmitOutcome};
pub use panel::{ChannelSink, run_panel};
