/*!
 * Ring Queues
 * Fixed-capacity FIFO queues for inter-thread data transfer
 */

pub mod errors;
pub mod queue;

// Re-exports
pub use errors::*;
pub use queue::{
    BlockingReadQueue, BlockingWriteQueue, BoundedQueue, Consumer, EnqueueResult, MpmcQueue,
    NonblockingQueue, Producer, QueueKind, QueueOptions, SpscQueue, DEFAULT_QUEUE_CAPACITY,
    MIN_CAPACITY,
};
