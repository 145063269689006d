/*!
 * Multi-Producer Multi-Consumer Blocking Ring Buffer
 *
 * One timed mutex guards the ring and its element count. Two condvars carry
 * wake-ups in opposite directions: `ready_to_read` after every enqueue,
 * `ready_to_write` after every dequeue.
 *
 * # Bounded blocking
 *
 * A blocking call spends its timeout in two phases: acquiring the lock, then
 * waiting on the condvar for space or data. Both phases are measured against
 * one deadline on the monotonic clock, so the call returns within `timeout`
 * plus scheduler wake-up latency no matter how the time is split.
 *
 * # Fairness
 *
 * Elements come out in the order they went in. Which waiter a notification
 * wakes is up to the scheduler.
 */

use super::ring::RingBuffer;
use super::traits::{BlockingReadQueue, BlockingWriteQueue, EnqueueResult, NonblockingQueue};
use crate::errors::{EnqueueError, QueueError, QueueResult};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Everything the lock protects
struct MpmcState<T> {
    ring: RingBuffer<T>,
    size: usize,
}

impl<T> MpmcState<T> {
    #[inline(always)]
    fn is_full(&self) -> bool {
        self.size == self.ring.capacity()
    }

    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Fixed-capacity FIFO queue shared by any number of producers and consumers
///
/// Share it across threads with `Arc` or scoped borrows.
///
/// # Examples
///
/// ```
/// use ring_queues::{BlockingReadQueue, MpmcQueue, NonblockingQueue};
/// use std::sync::Arc;
/// use std::thread;
/// use std::time::Duration;
///
/// let queue = Arc::new(MpmcQueue::new(8).unwrap());
/// let reader = {
///     let queue = queue.clone();
///     thread::spawn(move || queue.try_dequeue_for(Duration::from_secs(2)))
/// };
///
/// queue.try_enqueue(123).unwrap();
/// assert_eq!(reader.join().unwrap(), Ok(123));
/// ```
pub struct MpmcQueue<T> {
    state: Mutex<MpmcState<T>>,
    ready_to_read: Condvar,
    ready_to_write: Condvar,
    capacity: usize,
}

impl<T> MpmcQueue<T> {
    /// Create a queue that holds up to `capacity` elements
    ///
    /// Fails with `InvalidCapacity` for a capacity of zero.
    pub fn new(capacity: usize) -> QueueResult<Self> {
        let ring = RingBuffer::new(capacity)?;
        debug!(capacity, "MPMC queue created");
        Ok(Self {
            state: Mutex::new(MpmcState { ring, size: 0 }),
            ready_to_read: Condvar::new(),
            ready_to_write: Condvar::new(),
            capacity,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Element count at the moment the lock was taken
    pub fn len(&self) -> usize {
        self.state.lock().size
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.state.lock().is_full()
    }

    /// Store `item`, release the lock, then wake one reader
    #[inline]
    fn commit_enqueue(&self, mut state: MutexGuard<'_, MpmcState<T>>, item: T) {
        state.ring.put(item);
        state.size += 1;
        drop(state);
        self.ready_to_read.notify_one();
    }

    /// Take the oldest element, release the lock, then wake one writer
    #[inline]
    fn commit_dequeue(&self, mut state: MutexGuard<'_, MpmcState<T>>) -> QueueResult<T> {
        let item = state.ring.take().ok_or(QueueError::Empty)?;
        state.size -= 1;
        debug_assert!(state.size != 0 || state.ring.read_index() == state.ring.write_index());
        drop(state);
        self.ready_to_write.notify_one();
        Ok(item)
    }

    /// Phase one of a bounded call: take the lock within `timeout` of `start`
    ///
    /// Fails if the lock was not acquired, or if acquiring it used up the
    /// whole budget.
    fn lock_within(
        &self,
        start: Instant,
        timeout: Duration,
    ) -> QueueResult<MutexGuard<'_, MpmcState<T>>> {
        let Some(state) = self.state.try_lock_for(timeout) else {
            trace!(?timeout, "queue lock not acquired in time");
            return Err(QueueError::LockTimeout(timeout));
        };

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            trace!(?timeout, ?elapsed, "lock acquisition used the whole timeout");
            return Err(QueueError::LockTimeout(timeout));
        }
        Ok(state)
    }

    /// Phase two: wait on `condvar` while `blocked` holds, until the deadline
    ///
    /// Returns `true` once `blocked` is false. The predicate is re-checked
    /// after every wake-up, spurious or not.
    fn wait_until_ready(
        condvar: &Condvar,
        state: &mut MutexGuard<'_, MpmcState<T>>,
        blocked: fn(&MpmcState<T>) -> bool,
        start: Instant,
        timeout: Duration,
    ) -> bool {
        match start.checked_add(timeout) {
            Some(deadline) => {
                condvar.wait_while_until(state, |s| blocked(s), deadline);
            }
            // Deadline past the clock's range: effectively unbounded
            None => condvar.wait_while(state, |s| blocked(s)),
        }
        !blocked(state)
    }
}

impl<T> NonblockingQueue<T> for MpmcQueue<T> {
    fn try_enqueue(&self, item: T) -> EnqueueResult<T> {
        let Some(state) = self.state.try_lock() else {
            return Err(EnqueueError::new(item, QueueError::Contended));
        };
        if state.is_full() {
            return Err(EnqueueError::new(item, QueueError::Full));
        }
        self.commit_enqueue(state, item);
        Ok(())
    }

    fn try_dequeue(&self) -> QueueResult<T> {
        let state = self.state.try_lock().ok_or(QueueError::Contended)?;
        if state.is_empty() {
            return Err(QueueError::Empty);
        }
        self.commit_dequeue(state)
    }
}

impl<T> BlockingWriteQueue<T> for MpmcQueue<T> {
    fn try_enqueue_for(&self, item: T, timeout: Duration) -> EnqueueResult<T> {
        let start = Instant::now();
        let mut state = match self.lock_within(start, timeout) {
            Ok(state) => state,
            Err(reason) => return Err(EnqueueError::new(item, reason)),
        };

        if !Self::wait_until_ready(
            &self.ready_to_write,
            &mut state,
            MpmcState::is_full,
            start,
            timeout,
        ) {
            trace!(?timeout, "timed out waiting for space");
            return Err(EnqueueError::new(item, QueueError::Timeout(timeout)));
        }

        self.commit_enqueue(state, item);
        Ok(())
    }
}

impl<T> BlockingReadQueue<T> for MpmcQueue<T> {
    fn try_dequeue_for(&self, timeout: Duration) -> QueueResult<T> {
        let start = Instant::now();
        let mut state = self.lock_within(start, timeout)?;

        if !Self::wait_until_ready(
            &self.ready_to_read,
            &mut state,
            MpmcState::is_empty,
            start,
            timeout,
        ) {
            trace!(?timeout, "timed out waiting for data");
            return Err(QueueError::Timeout(timeout));
        }

        self.commit_dequeue(state)
    }
}

impl<T> fmt::Debug for MpmcQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("MpmcQueue");
        s.field("capacity", &self.capacity);
        match self.state.try_lock() {
            Some(state) => s.field("len", &state.size),
            None => s.field("len", &format_args!("<locked>")),
        };
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_full_capacity_usable() {
        let queue = MpmcQueue::new(3).unwrap();
        for i in 0..3 {
            queue.try_enqueue(i).unwrap();
        }
        assert!(queue.is_full());
        assert_eq!(queue.try_enqueue(3).unwrap_err().reason(), &QueueError::Full);

        for i in 0..3 {
            assert_eq!(queue.try_dequeue(), Ok(i));
        }
        assert_eq!(queue.try_dequeue(), Err(QueueError::Empty));
    }

    #[test]
    fn test_nonblocking_fails_fast_when_contended() {
        let queue = MpmcQueue::new(4).unwrap();
        queue.try_enqueue(1).unwrap();

        let _held = queue.state.lock();
        let err = queue.try_enqueue(2).unwrap_err();
        assert_eq!(err.reason(), &QueueError::Contended);
        assert_eq!(err.into_inner(), 2);
        assert_eq!(queue.try_dequeue(), Err(QueueError::Contended));
    }

    #[test]
    fn test_lock_timeout_reported() {
        let queue = MpmcQueue::<u32>::new(4).unwrap();
        let timeout = Duration::from_millis(50);

        let _held = queue.state.lock();
        let result = thread::scope(|s| {
            s.spawn(|| {
                let start = Instant::now();
                (queue.try_dequeue_for(timeout), start.elapsed())
            })
            .join()
            .unwrap()
        });

        assert_eq!(result.0, Err(QueueError::LockTimeout(timeout)));
        assert!(result.1 >= timeout);
    }

    #[test]
    fn test_lock_wait_counts_against_timeout() {
        let queue = MpmcQueue::<u32>::new(4).unwrap();
        let timeout = Duration::from_millis(400);
        let hold = Duration::from_millis(250);

        let (result, elapsed) = thread::scope(|s| {
            let guard = queue.state.lock();
            let reader = s.spawn(|| {
                let start = Instant::now();
                (queue.try_dequeue_for(timeout), start.elapsed())
            });
            thread::sleep(hold);
            drop(guard);
            reader.join().unwrap()
        });

        assert_eq!(result, Err(QueueError::Timeout(timeout)));
        assert!(elapsed >= timeout);
        // Lock wait plus a fresh full timeout would be ~650ms
        assert!(elapsed < hold + timeout, "took {:?}", elapsed);
    }

    #[test]
    fn test_zero_timeout_never_succeeds() {
        let queue = MpmcQueue::new(2).unwrap();
        assert!(queue.try_enqueue_for(1, Duration::ZERO).is_err());
        assert!(queue.try_dequeue_for(Duration::ZERO).is_err());
    }

    #[test]
    fn test_max_timeout_does_not_overflow() {
        let queue = MpmcQueue::new(2).unwrap();
        queue.try_enqueue_for(7, Duration::MAX).unwrap();
        assert_eq!(queue.try_dequeue_for(Duration::MAX), Ok(7));
    }

    #[test]
    fn test_debug_shows_len() {
        let queue = MpmcQueue::new(2).unwrap();
        queue.try_enqueue(1u8).unwrap();
        assert_eq!(format!("{:?}", queue), "MpmcQueue { capacity: 2, len: 1 }");
    }
}
