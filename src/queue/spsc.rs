/*!
 * Single-Producer Single-Consumer Ring Buffer
 *
 * Lock-free, never blocks. Emptiness and fullness come from comparing the
 * two cursors, so one slot always stays vacant: a queue of capacity `C`
 * holds at most `C - 1` elements.
 *
 * # Single writer, single reader
 *
 * The ring is only sound with one enqueuing thread and one dequeuing thread.
 * `SpscQueue` is deliberately `!Sync`, so its own methods can only be used
 * from the thread that owns it. To move data between two threads, call
 * [`SpscQueue::split`] and hand the [`Producer`] and the [`Consumer`] to
 * their threads; the borrow keeps anyone else out until both are dropped.
 */

use super::ring::{allocate_slots, next_index, validate_capacity};
use super::traits::{EnqueueResult, NonblockingQueue};
use crate::errors::{EnqueueError, QueueError, QueueResult};
use std::cell::UnsafeCell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Cursor on its own cache line so producer and consumer don't false-share
#[repr(C, align(64))]
struct Cursor(AtomicUsize);

impl Cursor {
    const fn new() -> Self {
        Self(AtomicUsize::new(0))
    }
}

/// Slot array plus the two cursors
///
/// `write_index` is stored only by the producer, `read_index` only by the
/// consumer. Each publishes with `Release` after touching its slot and reads
/// the other's cursor with `Acquire`.
struct SpscRing<T> {
    write_index: Cursor,
    read_index: Cursor,
    slots: Box<[UnsafeCell<Option<T>>]>,
}

impl<T> SpscRing<T> {
    fn new(capacity: usize) -> Self {
        Self {
            write_index: Cursor::new(),
            read_index: Cursor::new(),
            slots: allocate_slots(capacity, || UnsafeCell::new(None)),
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// # Safety
    ///
    /// At most one thread may be inside `push` at any time.
    #[inline]
    unsafe fn push(&self, item: T) -> Result<(), T> {
        let write = self.write_index.0.load(Ordering::Relaxed);
        let next = next_index(write, self.capacity());
        if next == self.read_index.0.load(Ordering::Acquire) {
            return Err(item);
        }

        // SAFETY: the consumer only reads slots before `write_index`, and we
        // have not published this one yet. We are the only producer.
        unsafe {
            *self.slots[write].get() = Some(item);
        }
        self.write_index.0.store(next, Ordering::Release);
        Ok(())
    }

    /// # Safety
    ///
    /// At most one thread may be inside `pop` at any time.
    #[inline]
    unsafe fn pop(&self) -> Option<T> {
        let read = self.read_index.0.load(Ordering::Relaxed);
        if read == self.write_index.0.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: the Acquire load above makes the producer's write to this
        // slot visible, and the producer won't reuse it until we advance
        // `read_index`. We are the only consumer.
        let item = unsafe { (*self.slots[read].get()).take() };
        self.read_index
            .0
            .store(next_index(read, self.capacity()), Ordering::Release);
        item
    }

    /// Snapshot of the element count
    #[inline]
    fn len(&self) -> usize {
        let write = self.write_index.0.load(Ordering::Acquire);
        let read = self.read_index.0.load(Ordering::Acquire);
        if write >= read {
            write - read
        } else {
            self.capacity() - read + write
        }
    }
}

/// Fixed-capacity nonblocking queue for exactly one producer and one consumer
///
/// # Examples
///
/// ```
/// use ring_queues::{NonblockingQueue, SpscQueue};
///
/// let mut queue = SpscQueue::new(4).unwrap();
/// let (mut producer, mut consumer) = queue.split();
///
/// std::thread::scope(|s| {
///     s.spawn(move || {
///         for i in 0..100u32 {
///             let mut item = i;
///             while let Err(err) = producer.try_enqueue(item) {
///                 item = err.into_inner();
///                 std::hint::spin_loop();
///             }
///         }
///     });
///     s.spawn(move || {
///         let mut expected = 0u32;
///         while expected < 100 {
///             if let Ok(value) = consumer.try_dequeue() {
///                 assert_eq!(value, expected);
///                 expected += 1;
///             }
///         }
///     });
/// });
///
/// assert!(queue.try_dequeue().is_err());
/// ```
pub struct SpscQueue<T> {
    ring: SpscRing<T>,
}

impl<T> SpscQueue<T> {
    /// Create a queue with `capacity` slots (`capacity - 1` usable)
    ///
    /// Fails with `InvalidCapacity` for a capacity of zero.
    pub fn new(capacity: usize) -> QueueResult<Self> {
        let capacity = validate_capacity(capacity)?;
        debug!(capacity, usable = capacity - 1, "SPSC queue created");
        Ok(Self {
            ring: SpscRing::new(capacity),
        })
    }

    /// Number of slots, including the one that always stays vacant
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Maximum number of elements held at once
    #[inline]
    pub fn usable_capacity(&self) -> usize {
        self.ring.capacity() - 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.usable_capacity()
    }

    /// Split into the two endpoints for cross-thread use
    pub fn split(&mut self) -> (Producer<'_, T>, Consumer<'_, T>) {
        let ring = &self.ring;
        (Producer { ring }, Consumer { ring })
    }
}

impl<T> NonblockingQueue<T> for SpscQueue<T> {
    fn try_enqueue(&self, item: T) -> EnqueueResult<T> {
        // SAFETY: `SpscQueue` is !Sync, so every `&self` caller is on the
        // owning thread, and `split` holds `&mut self` while handles exist.
        unsafe { self.ring.push(item) }.map_err(|item| EnqueueError::new(item, QueueError::Full))
    }

    fn try_dequeue(&self) -> QueueResult<T> {
        // SAFETY: see `try_enqueue`.
        unsafe { self.ring.pop() }.ok_or(QueueError::Empty)
    }
}

impl<T> fmt::Debug for SpscQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpscQueue")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish()
    }
}

/// Enqueuing endpoint of a split [`SpscQueue`]
pub struct Producer<'a, T> {
    ring: &'a SpscRing<T>,
}

// SAFETY: a Producer is the only handle allowed to push, and it is neither
// Clone nor Sync, so moving it to another thread keeps a single producer.
unsafe impl<T: Send> Send for Producer<'_, T> {}

impl<T> Producer<'_, T> {
    /// Add `item` if there is room; never blocks
    #[inline]
    pub fn try_enqueue(&mut self, item: T) -> EnqueueResult<T> {
        // SAFETY: `&mut self` on the unique producer handle.
        unsafe { self.ring.push(item) }.map_err(|item| EnqueueError::new(item, QueueError::Full))
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.len() == self.ring.capacity() - 1
    }
}

/// Dequeuing endpoint of a split [`SpscQueue`]
pub struct Consumer<'a, T> {
    ring: &'a SpscRing<T>,
}

// SAFETY: same argument as for Producer, for the consumer role.
unsafe impl<T: Send> Send for Consumer<'_, T> {}

impl<T> Consumer<'_, T> {
    /// Remove the oldest element if one is available; never blocks
    #[inline]
    pub fn try_dequeue(&mut self) -> QueueResult<T> {
        // SAFETY: `&mut self` on the unique consumer handle.
        unsafe { self.ring.pop() }.ok_or(QueueError::Empty)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.len() == 0
    }
}
