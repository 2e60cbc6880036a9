//! Outbound notification gateway.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for notifier operations.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// One outbound message, possibly addressed to several recipients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Sender address.
    pub from: String,
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Rendered body.
    pub body: String,
}

/// Sends notifications to users.
///
/// Delivery is best-effort from the caller's point of view: a failure is
/// reported but never undoes the state change that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers `notification` to every recipient.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when delivery fails.
    async fn send(&self, notification: &Notification) -> NotifierResult<()>;
}

/// Errors raised while delivering notifications.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The notification carried no recipients.
    #[error("notification has no recipients")]
    NoRecipients,

    /// The notification template could not be rendered.
    #[error("failed to render notification: {0}")]
    Render(String),

    /// Delivery did not finish in time.
    #[error("notification delivery timed out after {0:?}")]
    TimedOut(Duration),

    /// The delivery backend rejected the message.
    #[error("notification delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a delivery backend error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
