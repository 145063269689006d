/*!
 * Bounded Queue Dispatch
 *
 * Enum over the concrete variants so options-built queues can be used
 * through the capability traits without `Box<dyn ...>`.
 */

use super::config::QueueKind;
use super::mpmc::MpmcQueue;
use super::spsc::SpscQueue;
use super::traits::{BlockingReadQueue, BlockingWriteQueue, EnqueueResult, NonblockingQueue};
use crate::errors::{EnqueueError, QueueError, QueueResult};
use std::time::Duration;

/// Queue built from [`QueueOptions`](super::config::QueueOptions)
///
/// Blocking operations on the SPSC arm fail with `Unsupported`.
///
/// The enum inherits `SpscQueue`'s `!Sync`, so it is driven from one thread.
/// For cross-thread use take the concrete queue out: [`into_mpmc`] and wrap
/// it in `Arc`, or [`as_spsc_mut`] and `split` it.
///
/// [`into_mpmc`]: BoundedQueue::into_mpmc
/// [`as_spsc_mut`]: BoundedQueue::as_spsc_mut
#[derive(Debug)]
pub enum BoundedQueue<T> {
    Spsc(SpscQueue<T>),
    Mpmc(MpmcQueue<T>),
}

impl<T> BoundedQueue<T> {
    pub fn new(kind: QueueKind, capacity: usize) -> QueueResult<Self> {
        Ok(match kind {
            QueueKind::Spsc => Self::Spsc(SpscQueue::new(capacity)?),
            QueueKind::Mpmc => Self::Mpmc(MpmcQueue::new(capacity)?),
        })
    }

    pub fn kind(&self) -> QueueKind {
        match self {
            Self::Spsc(_) => QueueKind::Spsc,
            Self::Mpmc(_) => QueueKind::Mpmc,
        }
    }

    pub fn capacity(&self) -> usize {
        match self {
            Self::Spsc(q) => q.capacity(),
            Self::Mpmc(q) => q.capacity(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Spsc(q) => q.len(),
            Self::Mpmc(q) => q.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_spsc_mut(&mut self) -> Option<&mut SpscQueue<T>> {
        match self {
            Self::Spsc(q) => Some(q),
            Self::Mpmc(_) => None,
        }
    }

    pub fn into_mpmc(self) -> Option<MpmcQueue<T>> {
        match self {
            Self::Mpmc(q) => Some(q),
            Self::Spsc(_) => None,
        }
    }
}

impl<T> NonblockingQueue<T> for BoundedQueue<T> {
    #[inline]
    fn try_enqueue(&self, item: T) -> EnqueueResult<T> {
        match self {
            Self::Spsc(q) => q.try_enqueue(item),
            Self::Mpmc(q) => q.try_enqueue(item),
        }
    }

    #[inline]
    fn try_dequeue(&self) -> QueueResult<T> {
        match self {
            Self::Spsc(q) => q.try_dequeue(),
            Self::Mpmc(q) => q.try_dequeue(),
        }
    }
}

impl<T> BlockingWriteQueue<T> for BoundedQueue<T> {
    fn try_enqueue_for(&self, item: T, timeout: Duration) -> EnqueueResult<T> {
        match self {
            Self::Spsc(_) => Err(EnqueueError::new(
                item,
                QueueError::Unsupported("blocking write on an SPSC queue"),
            )),
            Self::Mpmc(q) => q.try_enqueue_for(item, timeout),
        }
    }
}

impl<T> BlockingReadQueue<T> for BoundedQueue<T> {
    fn try_dequeue_for(&self, timeout: Duration) -> QueueResult<T> {
        match self {
            Self::Spsc(_) => Err(QueueError::Unsupported("blocking read on an SPSC queue")),
            Self::Mpmc(q) => q.try_dequeue_for(timeout),
        }
    }
}
