//! In-memory implementations for testing.
//!
//! Available behind the `test-utils` feature flag. These are minimal
//! implementations that prove the trait APIs are usable and give
//! coordinator tests deterministic control over stream timing.

mod recording_sink;
mod scripted_backend;

pub use recording_sink::RecordingSink;
pub use scripted_backend::{ScriptStep, ScriptedBackend};
