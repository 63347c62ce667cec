//! Cancellation scopes with optional deadlines
//!
//! A [`Scope`] pairs a [`CancellationToken`] with an optional expiry instant.
//! Child scopes inherit cancellation from their parent and never outlive the
//! parent's deadline. Once a scope is done it stays done.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::shared::errors::FetchError;

#[derive(Debug, Clone)]
pub struct Scope {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Scope {
    /// Root scope with no deadline; only an explicit `cancel` ends it
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Root scope that expires at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Derive a child scope that expires after `timeout`, or earlier if the
    /// parent's own deadline comes first.
    ///
    /// A timeout too large to represent as an instant (such as `Duration::MAX`)
    /// adds no deadline of its own; the child keeps the parent's, if any.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let deadline = match (self.deadline, Instant::now().checked_add(timeout)) {
            (Some(parent_deadline), Some(own_deadline)) => Some(parent_deadline.min(own_deadline)),
            (parent_deadline, None) => parent_deadline,
            (None, own_deadline) => own_deadline,
        };

        Self {
            token: self.token.child_token(),
            deadline,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel this scope and every scope derived from it
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.is_expired()
    }

    /// Resolves once the scope is cancelled or its deadline passes
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }

    /// Reason a fetch should report after observing `done`.
    ///
    /// An expired deadline takes precedence over cancellation, so a sibling
    /// that gives up after the deadline still reports a timeout.
    pub fn error(&self) -> FetchError {
        if self.is_expired() {
            FetchError::DeadlineExceeded
        } else {
            FetchError::Cancelled
        }
    }

    /// Guard that cancels this scope when dropped
    pub fn drop_guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }
}
