//! Caller-controlled cancellation scopes.
//!
//! A [`CancelScope`] is handed to every send. The pipeline observes it but
//! never creates it: the caller decides when to cancel, and may attach a
//! deadline after which the scope counts as cancelled on its own.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a scope stopped an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller cancelled the scope explicitly
    Cancelled,
    /// The scope's deadline passed
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Cancelled => write!(f, "cancelled by caller"),
            CancelReason::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// A cancellable, optionally deadline-bound scope.
///
/// Cloning a scope shares the underlying token: cancelling any clone
/// cancels all of them. [`child`](Self::child) creates a scope that is
/// cancelled with its parent but can also be cancelled on its own.
///
/// # Examples
///
/// ```
/// use typed_ops::CancelScope;
///
/// let scope = CancelScope::new();
/// let child = scope.child();
///
/// scope.cancel();
/// assert!(child.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelScope {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelScope {
    /// Creates a scope with no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scope that expires `timeout` from now.
    ///
    /// A timeout too large to represent as an instant yields a scope with
    /// no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Creates a scope that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Creates a child scope sharing this scope's deadline.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Creates a child scope whose deadline is the earlier of this scope's
    /// deadline and `timeout` from now.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let local = Instant::now().checked_add(timeout);
        let deadline = match (self.deadline, local) {
            (Some(parent), Some(local)) => Some(parent.min(local)),
            (parent, local) => parent.or(local),
        };
        Self {
            token: self.token.child_token(),
            deadline,
        }
    }

    /// Cancels this scope and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns why the scope is no longer live, or `None` while it is.
    pub fn reason(&self) -> Option<CancelReason> {
        if self.token.is_cancelled() {
            Some(CancelReason::Cancelled)
        } else if self.deadline.is_some_and(|d| d <= Instant::now()) {
            Some(CancelReason::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Returns true once the scope is cancelled or its deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    /// Waits until the scope is cancelled or expires.
    ///
    /// Explicit cancellation wins if both happen at once.
    pub async fn cancelled(&self) -> CancelReason {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => CancelReason::Cancelled,
                _ = tokio::time::sleep_until(deadline) => CancelReason::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                CancelReason::Cancelled
            }
        }
    }
}
