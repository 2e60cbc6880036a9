//! Adapter implementations for team persistence and notification ports.

pub mod memory;
pub mod postgres;

mod notifier;

pub use notifier::{RecordingNotifier, TracingNotifier};
