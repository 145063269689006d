/*!
 * Queue Capability Traits
 *
 * Independent capabilities a concrete queue implements selectively:
 * - `NonblockingQueue`: fail-fast enqueue/dequeue
 * - `BlockingWriteQueue`: enqueue bounded by a timeout
 * - `BlockingReadQueue`: dequeue bounded by a timeout
 *
 * A factory can hand out any variant behind these traits without the
 * variants sharing a base type.
 */

use crate::errors::{EnqueueError, QueueResult};
use std::time::Duration;

/// Result of an enqueue attempt
///
/// On failure the item comes back inside the error.
pub type EnqueueResult<T> = Result<(), EnqueueError<T>>;

/// Enqueue and dequeue without ever suspending the caller
pub trait NonblockingQueue<T> {
    /// Add `item` if there is room right now
    ///
    /// Fails with `Full` when at capacity. Lock-based queues also fail with
    /// `Contended` instead of waiting for the lock.
    fn try_enqueue(&self, item: T) -> EnqueueResult<T>;

    /// Remove the oldest element if one is available right now
    ///
    /// Fails with `Empty` when there is nothing to read. Lock-based queues
    /// also fail with `Contended` instead of waiting for the lock.
    fn try_dequeue(&self) -> QueueResult<T>;
}

/// Enqueue that may wait, up to a total bound, for the lock and for space
pub trait BlockingWriteQueue<T> {
    /// Add `item`, waiting at most `timeout` in total
    fn try_enqueue_for(&self, item: T, timeout: Duration) -> EnqueueResult<T>;

    /// Millisecond convenience for [`try_enqueue_for`](Self::try_enqueue_for)
    #[inline]
    fn try_enqueue_for_millis(&self, item: T, timeout_ms: u64) -> EnqueueResult<T> {
        self.try_enqueue_for(item, Duration::from_millis(timeout_ms))
    }
}

/// Dequeue that may wait, up to a total bound, for the lock and for data
pub trait BlockingReadQueue<T> {
    /// Remove the oldest element, waiting at most `timeout` in total
    fn try_dequeue_for(&self, timeout: Duration) -> QueueResult<T>;

    /// Millisecond convenience for [`try_dequeue_for`](Self::try_dequeue_for)
    #[inline]
    fn try_dequeue_for_millis(&self, timeout_ms: u64) -> QueueResult<T> {
        self.try_dequeue_for(Duration::from_millis(timeout_ms))
    }
}
