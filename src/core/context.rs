//! # Cause-carrying cancellation.
//!
//! [`CancelContext`] wraps a [`CancellationToken`] and remembers **why** it was
//! cancelled. Contexts form a tree:
//!
//! ```text
//! root (binary)           cancel(ShutdownSignal) on SIGINT/SIGTERM
//!   └─► group child       cancel(InstanceFailed) on unwatched failure
//!         ├─► instance 0  (shares the group context)
//!         └─► instance N
//! ```
//!
//! ## Rules
//! - Cancelling a parent cancels every child; cancelling a child never touches the parent.
//! - The first cause wins; later `cancel` calls are no-ops for the cause.
//! - A child cancelled through its parent reports the parent's cause.

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use tokio_util::sync::CancellationToken;

/// Why a context was cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelCause {
    /// Cancelled by the caller without a more specific reason.
    Requested,
    /// The host asked the supervisor to stop (SIGINT, SIGTERM, ...).
    ShutdownSignal,
    /// An unwatched instance failed and took the group down.
    InstanceFailed {
        /// Index of the failed instance.
        index: usize,
        /// Failure message.
        error: String,
    },
}

impl fmt::Display for CancelCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelCause::Requested => write!(f, "cancel requested"),
            CancelCause::ShutdownSignal => write!(f, "shutdown signal received"),
            CancelCause::InstanceFailed { index, error } => {
                write!(f, "instance {index} failed: {error}")
            }
        }
    }
}

struct Inner {
    token: CancellationToken,
    cause: OnceLock<CancelCause>,
    parent: Option<CancelContext>,
}

/// Shared, derivable cancellation handle.
///
/// Cheap to clone; clones observe and trigger the same cancellation.
#[derive(Clone)]
pub struct CancelContext {
    inner: Arc<Inner>,
}

impl CancelContext {
    /// Creates a new root context.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                token: CancellationToken::new(),
                cause: OnceLock::new(),
                parent: None,
            }),
        }
    }

    /// Derives a child context: cancelled with `self`, cancellable on its own.
    pub fn child(&self) -> Self {
        Self {
            inner: Arc::new(Inner {
                token: self.inner.token.child_token(),
                cause: OnceLock::new(),
                parent: Some(self.clone()),
            }),
        }
    }

    /// Cancels this context (and its children), recording `cause` if none was recorded yet.
    pub fn cancel(&self, cause: CancelCause) {
        let _ = self.inner.cause.set(cause);
        self.inner.token.cancel();
    }

    /// Returns `true` once this context or an ancestor was cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// Completes when the context is cancelled.
    pub async fn cancelled(&self) {
        self.inner.token.cancelled().await
    }

    /// Returns the cancellation cause, or `None` while the context is live.
    pub fn cause(&self) -> Option<CancelCause> {
        if !self.is_cancelled() {
            return None;
        }
        if let Some(cause) = self.inner.cause.get() {
            return Some(cause.clone());
        }
        Some(
            self.inner
                .parent
                .as_ref()
                .and_then(CancelContext::cause)
                .unwrap_or(CancelCause::Requested),
        )
    }

    /// Returns the underlying token, for APIs that take a [`CancellationToken`].
    pub fn token(&self) -> &CancellationToken {
        &self.inner.token
    }
}

impl Default for CancelContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelContext")
            .field("cancelled", &self.is_cancelled())
            .field("cause", &self.cause())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_context_has_no_cause() {
        let ctx = CancelContext::new();
        assert!(!ctx.is_cancelled());
        assert_eq!(ctx.cause(), None);
    }

    #[test]
    fn test_first_cause_wins() {
        let ctx = CancelContext::new();
        ctx.cancel(CancelCause::ShutdownSignal);
        ctx.cancel(CancelCause::Requested);
        assert_eq!(ctx.cause(), Some(CancelCause::ShutdownSignal));
    }

    #[test]
    fn test_child_inherits_parent_cause() {
        let root = CancelContext::new();
        let child = root.child();
        root.cancel(CancelCause::ShutdownSignal);
        assert!(child.is_cancelled());
        assert_eq!(child.cause(), Some(CancelCause::ShutdownSignal));
    }

    #[test]
    fn test_child_cancel_does_not_reach_parent() {
        let root = CancelContext::new();
        let child = root.child();
        let cause = CancelCause::InstanceFailed {
            index: 0,
            error: "exit status: 1".into(),
        };
        child.cancel(cause.clone());
        assert!(!root.is_cancelled());
        assert_eq!(child.cause(), Some(cause));
    }

    #[tokio::test]
    async fn test_cancelled_future_completes() {
        let ctx = CancelContext::new();
        let waiter = ctx.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        ctx.cancel(CancelCause::Requested);
        handle.await.expect("waiter should finish");
    }
}
