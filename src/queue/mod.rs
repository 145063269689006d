/*!
 * Bounded Queues
 *
 * Fixed-capacity FIFO ring buffers for moving data between threads:
 * - SPSC: lock-free, nonblocking, one producer and one consumer
 * - MPMC: one lock and two condvars, nonblocking or timeout-bounded
 *
 * # Architecture
 *
 * Both variants share the ring cursor arithmetic and implement the
 * capability traits they support. `QueueOptions` maps a capability request
 * onto a variant and builds it behind the `BoundedQueue` enum.
 */

mod config;
mod dispatch;
mod mpmc;
mod ring;
mod spsc;
mod traits;

// Re-export public API
pub use config::{QueueKind, QueueOptions, DEFAULT_QUEUE_CAPACITY};
pub use dispatch::BoundedQueue;
pub use mpmc::MpmcQueue;
pub use ring::MIN_CAPACITY;
pub use spsc::{Consumer, Producer, SpscQueue};
pub use traits::{BlockingReadQueue, BlockingWriteQueue, EnqueueResult, NonblockingQueue};
