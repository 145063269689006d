/*!
 * Queue Options
 *
 * Describes the queue a caller wants in terms of capabilities, and picks
 * the variant that provides them.
 */

use super::dispatch::BoundedQueue;
use crate::errors::QueueResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Capacity used when options don't name one
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Concrete queue variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    /// Lock-free, one producer and one consumer, nonblocking only
    Spsc,
    /// Locked, any number of producers and consumers, optional blocking
    Mpmc,
}

impl QueueKind {
    pub fn supports_blocking(&self) -> bool {
        matches!(self, Self::Mpmc)
    }

    pub fn supports_concurrency(&self) -> bool {
        matches!(self, Self::Mpmc)
    }
}

/// Options for creating a fixed-size queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueOptions {
    /// Number of slots
    pub capacity: usize,
    /// More than one thread may dequeue at once
    pub concurrent_readers: bool,
    /// More than one thread may enqueue at once
    pub concurrent_writers: bool,
    /// Dequeue may wait for data
    pub supports_blocking_read: bool,
    /// Enqueue may wait for space
    pub supports_blocking_write: bool,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            concurrent_readers: false,
            concurrent_writers: false,
            supports_blocking_read: false,
            supports_blocking_write: false,
        }
    }
}

impl QueueOptions {
    /// One producer, one consumer, no blocking
    pub const fn spsc(capacity: usize) -> Self {
        Self {
            capacity,
            concurrent_readers: false,
            concurrent_writers: false,
            supports_blocking_read: false,
            supports_blocking_write: false,
        }
    }

    /// Any number of producers and consumers, blocking both ways
    pub const fn mpmc(capacity: usize) -> Self {
        Self {
            capacity,
            concurrent_readers: true,
            concurrent_writers: true,
            supports_blocking_read: true,
            supports_blocking_write: true,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_concurrent_readers(mut self, enabled: bool) -> Self {
        self.concurrent_readers = enabled;
        self
    }

    pub fn with_concurrent_writers(mut self, enabled: bool) -> Self {
        self.concurrent_writers = enabled;
        self
    }

    pub fn with_blocking_read(mut self, enabled: bool) -> Self {
        self.supports_blocking_read = enabled;
        self
    }

    pub fn with_blocking_write(mut self, enabled: bool) -> Self {
        self.supports_blocking_write = enabled;
        self
    }

    /// Variant that satisfies these options
    ///
    /// SPSC only when nothing beyond one nonblocking writer and one
    /// nonblocking reader is asked for; everything else needs MPMC.
    pub fn kind(&self) -> QueueKind {
        let needs_mpmc = self.concurrent_readers
            || self.concurrent_writers
            || self.supports_blocking_read
            || self.supports_blocking_write;

        if needs_mpmc {
            QueueKind::Mpmc
        } else {
            QueueKind::Spsc
        }
    }

    /// Build the queue these options describe
    pub fn build<T>(&self) -> QueueResult<BoundedQueue<T>> {
        let kind = self.kind();
        debug!(?kind, capacity = self.capacity, "Building queue from options");
        BoundedQueue::new(kind, self.capacity)
    }
}
