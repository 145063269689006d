/*!
 * Ring Buffer Core
 *
 * Capacity validation, modular cursor advance and owned slot storage shared
 * by the SPSC and MPMC queues.
 */

use crate::errors::{QueueError, QueueResult};

/// Smallest capacity a queue accepts
pub const MIN_CAPACITY: usize = 1;

/// Reject capacities no ring can be built with
#[inline]
pub(crate) fn validate_capacity(capacity: usize) -> QueueResult<usize> {
    if capacity < MIN_CAPACITY {
        return Err(QueueError::InvalidCapacity(capacity));
    }
    Ok(capacity)
}

/// Advance a cursor by one slot, wrapping to 0 at `capacity`
///
/// Equivalent to `(index + 1) % capacity` without the division.
#[inline(always)]
pub(crate) const fn next_index(index: usize, capacity: usize) -> usize {
    let next = index + 1;
    if next == capacity {
        0
    } else {
        next
    }
}

/// Allocate `capacity` slots in one contiguous buffer
pub(crate) fn allocate_slots<S>(capacity: usize, mut make: impl FnMut() -> S) -> Box<[S]> {
    (0..capacity).map(|_| make()).collect()
}

/// Circular slot array with a write cursor and a read cursor
///
/// Holds no element count; callers that need full/empty detection track it
/// themselves. Both cursors stay in `[0, capacity)`.
pub(crate) struct RingBuffer<T> {
    slots: Box<[Option<T>]>,
    write_index: usize,
    read_index: usize,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> QueueResult<Self> {
        let capacity = validate_capacity(capacity)?;
        Ok(Self {
            slots: allocate_slots(capacity, || None),
            write_index: 0,
            read_index: 0,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    #[inline]
    pub fn read_index(&self) -> usize {
        self.read_index
    }

    /// Store `item` at the write cursor and advance it
    ///
    /// The caller must have checked there is room; an occupied slot here
    /// means its count is wrong.
    #[inline]
    pub fn put(&mut self, item: T) {
        debug_assert!(self.slots[self.write_index].is_none());
        self.slots[self.write_index] = Some(item);
        self.write_index = next_index(self.write_index, self.capacity());
    }

    /// Move the element out of the read cursor and advance it
    ///
    /// Returns `None` (leaving the cursor alone) if the slot is vacant.
    #[inline]
    pub fn take(&mut self) -> Option<T> {
        let item = self.slots[self.read_index].take()?;
        self.read_index = next_index(self.read_index, self.capacity());
        Some(item)
    }
}
