//! Request-scoped identity, deadline, and cancellation.
//!
//! Every service operation receives a [`RequestContext`]. Store calls are run
//! through [`RequestContext::guard`], so a cancelled or expired request stops
//! before it issues further reads and never starts a write.

use crate::team::domain::{EmailAddress, User, UserId};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    user: User,
}

impl RequestIdentity {
    /// Wraps an authenticated user.
    #[must_use]
    pub const fn new(user: User) -> Self {
        Self { user }
    }

    /// Returns the authenticated user.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Returns the caller's identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user.id()
    }

    /// Returns the caller's email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        self.user.email()
    }
}

/// Why a request context stopped accepting work.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ContextError {
    /// The owner cancelled the request.
    #[error("request was cancelled")]
    Cancelled,

    /// The request deadline passed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

/// Owner-side handle that cancels a [`RequestContext`].
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancels the context and every clone of it.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

/// Identity plus cancellation and deadline for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    identity: RequestIdentity,
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

impl RequestContext {
    /// Creates a context with no deadline that cannot be cancelled.
    #[must_use]
    pub const fn new(identity: RequestIdentity) -> Self {
        Self {
            identity,
            deadline: None,
            cancel: None,
        }
    }

    /// Creates a context together with the handle that cancels it.
    #[must_use]
    pub fn cancellable(identity: RequestIdentity) -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        let context = Self {
            identity,
            deadline: None,
            cancel: Some(receiver),
        };
        (context, CancelHandle { sender })
    }

    /// Sets the deadline to `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns the authenticated caller.
    #[must_use]
    pub const fn identity(&self) -> &RequestIdentity {
        &self.identity
    }

    /// Returns the deadline, if one was set.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fails if the context has already been cancelled or has expired.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] describing why the context ended.
    pub fn check(&self) -> Result<(), ContextError> {
        if self.cancel.as_ref().is_some_and(|receiver| *receiver.borrow()) {
            return Err(ContextError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(ContextError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Runs `operation` unless the context ends first.
    ///
    /// An already ended context fails without polling `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when the context is cancelled or expires
    /// before `operation` completes.
    pub async fn guard<F>(&self, operation: F) -> Result<F::Output, ContextError>
    where
        F: Future,
    {
        self.check()?;
        let cancelled = wait_for_cancel(self.cancel.clone());
        let expired = wait_for_deadline(self.deadline);
        tokio::select! {
            biased;
            () = cancelled => Err(ContextError::Cancelled),
            () = expired => Err(ContextError::DeadlineExceeded),
            output = operation => Ok(output),
        }
    }
}

async fn wait_for_cancel(receiver: Option<watch::Receiver<bool>>) {
    let Some(mut cancel) = receiver else {
        return std::future::pending().await;
    };
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        // A dropped handle can no longer cancel.
        if cancel.changed().await.is_err() {
            return std::future::pending().await;
        }
    }
}

async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(instant) => tokio::time::sleep_until(instant).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[fixture]
    fn identity() -> RequestIdentity {
        let email = EmailAddress::new("caller@example.com").expect("valid email");
        RequestIdentity::new(User::new(email, "Grace", "Hopper", &DefaultClock))
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn guard_returns_operation_output(identity: RequestIdentity) {
        let context = RequestContext::new(identity);
        let output = context.guard(async { 7 }).await;
        assert_eq!(output, Ok(7));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn cancelled_context_never_polls_operation(identity: RequestIdentity) {
        let (context, handle) = RequestContext::cancellable(identity);
        handle.cancel();
        let polled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&polled);

        let result = context
            .guard(async move {
                flag.store(true, Ordering::SeqCst);
            })
            .await;

        assert_eq!(result, Err(ContextError::Cancelled));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn cancellation_interrupts_pending_operation(identity: RequestIdentity) {
        let (context, handle) = RequestContext::cancellable(identity);
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        });

        let result = context
            .guard(tokio::time::sleep(Duration::from_secs(30)))
            .await;

        assert_eq!(result, Err(ContextError::Cancelled));
        canceller.await.expect("canceller task should finish");
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn deadline_interrupts_pending_operation(identity: RequestIdentity) {
        let context = RequestContext::new(identity).with_timeout(Duration::from_millis(20));
        let result = context
            .guard(tokio::time::sleep(Duration::from_secs(30)))
            .await;
        assert_eq!(result, Err(ContextError::DeadlineExceeded));
    }

    #[rstest]
    fn expired_deadline_fails_check(identity: RequestIdentity) {
        let context = RequestContext::new(identity).with_deadline(Instant::now());
        assert_eq!(context.check(), Err(ContextError::DeadlineExceeded));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn dropped_handle_leaves_context_usable(identity: RequestIdentity) {
        let (context, handle) = RequestContext::cancellable(identity);
        drop(handle);
        assert_eq!(context.guard(async { "done" }).await, Ok("done"));
    }
}
