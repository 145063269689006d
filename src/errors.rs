/*!
 * Error Types
 * Queue failure taxonomy with thiserror and miette support
 */

use miette::Diagnostic;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Reasons a queue operation can fail
///
/// None of these leave the queue in an inconsistent state. Retry policy is
/// the caller's business.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum QueueError {
    #[error("Queue is full")]
    #[diagnostic(
        code(queue::full),
        help("Dequeue elements or retry with a blocking enqueue.")
    )]
    Full,

    #[error("Queue is empty")]
    #[diagnostic(
        code(queue::empty),
        help("Enqueue elements or retry with a blocking dequeue.")
    )]
    Empty,

    #[error("Timed out after {0:?} waiting for the queue")]
    #[diagnostic(
        code(queue::timeout),
        help("No counterpart made progress in time. Consider a longer timeout.")
    )]
    Timeout(Duration),

    #[error("Timed out after {0:?} acquiring the queue lock")]
    #[diagnostic(
        code(queue::lock_timeout),
        help("The queue is heavily contended. Consider a longer timeout or fewer threads.")
    )]
    LockTimeout(Duration),

    #[error("Queue lock is held by another thread")]
    #[diagnostic(
        code(queue::contended),
        help("Nonblocking operations never wait for the lock. Retry or use a blocking operation.")
    )]
    Contended,

    #[error("Invalid queue capacity: {0}")]
    #[diagnostic(
        code(queue::invalid_capacity),
        help("Capacity must be at least 1.")
    )]
    InvalidCapacity(usize),

    #[error("Operation not supported: {0}")]
    #[diagnostic(
        code(queue::unsupported),
        help("Request the capability in QueueOptions before building the queue.")
    )]
    Unsupported(&'static str),
}

impl QueueError {
    /// Whether the failure came from a bounded wait running out
    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::LockTimeout(_))
    }
}

/// Failed enqueue, handing the rejected item back to the caller
#[derive(Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct EnqueueError<T> {
    item: T,
    reason: QueueError,
}

impl<T> EnqueueError<T> {
    #[inline]
    pub(crate) fn new(item: T, reason: QueueError) -> Self {
        Self { item, reason }
    }

    /// Why the item was rejected
    #[inline]
    pub fn reason(&self) -> &QueueError {
        &self.reason
    }

    /// Recover the rejected item
    #[inline]
    pub fn into_inner(self) -> T {
        self.item
    }

    /// Split into the item and the reason
    #[inline]
    pub fn into_parts(self) -> (T, QueueError) {
        (self.item, self.reason)
    }
}

// Manual impl so T does not need Debug
impl<T> fmt::Debug for EnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnqueueError")
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

impl<T> From<EnqueueError<T>> for QueueError {
    fn from(err: EnqueueError<T>) -> Self {
        err.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_error_returns_item() {
        let err = EnqueueError::new(42, QueueError::Full);
        assert_eq!(err.reason(), &QueueError::Full);
        assert_eq!(err.to_string(), "Queue is full");
        assert_eq!(err.into_inner(), 42);
    }

    #[test]
    fn test_timeout_classification() {
        assert!(QueueError::Timeout(Duration::from_millis(5)).is_timeout());
        assert!(QueueError::LockTimeout(Duration::from_millis(5)).is_timeout());
        assert!(!QueueError::Contended.is_timeout());
        assert!(!QueueError::Full.is_timeout());
    }

    #[test]
    fn test_converts_into_queue_error() {
        let err: QueueError = EnqueueError::new("x", QueueError::Contended).into();
        assert_eq!(err, QueueError::Contended);
    }
}
