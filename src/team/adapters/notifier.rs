//! Notifier adapters: a log-backed sender and an in-memory recorder.

use crate::team::ports::{Notification, Notifier, NotifierError, NotifierResult};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Notifier that writes every message to the tracing log.
///
/// Used where no mail transport is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates a tracing notifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, notification: &Notification) -> NotifierResult<()> {
        if notification.to.is_empty() {
            return Err(NotifierError::NoRecipients);
        }
        info!(
            from = %notification.from,
            to = ?notification.to,
            subject = %notification.subject,
            body_len = notification.body.len(),
            "notification dispatched"
        );
        Ok(())
    }
}

/// Notifier that keeps sent messages in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    state: Arc<Mutex<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    sent: Vec<Notification>,
    failing: bool,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes later sends fail with a delivery error.
    pub fn fail_deliveries(&self, failing: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.failing = failing;
        }
    }

    /// Returns every successfully recorded notification, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.state
            .lock()
            .map(|state| state.sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> NotifierResult<()> {
        if notification.to.is_empty() {
            return Err(NotifierError::NoRecipients);
        }
        let mut state = self
            .state
            .lock()
            .map_err(|err| NotifierError::delivery(std::io::Error::other(err.to_string())))?;
        if state.failing {
            return Err(NotifierError::delivery(std::io::Error::other(
                "delivery disabled",
            )));
        }
        state.sent.push(notification.clone());
        Ok(())
    }
}
