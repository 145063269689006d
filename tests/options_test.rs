/*!
 * Queue Options Tests
 * Variant selection, deserialization and building through the factory
 */

use pretty_assertions::assert_eq;
use ring_queues::{
    BlockingReadQueue, BlockingWriteQueue, BoundedQueue, NonblockingQueue, QueueError, QueueKind,
    QueueOptions, DEFAULT_QUEUE_CAPACITY,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_selection_table() {
    let cases = [
        (false, false, false, false, QueueKind::Spsc),
        (true, false, false, false, QueueKind::Mpmc),
        (false, true, false, false, QueueKind::Mpmc),
        (false, false, true, false, QueueKind::Mpmc),
        (false, false, false, true, QueueKind::Mpmc),
        (true, true, true, true, QueueKind::Mpmc),
    ];

    for (readers, writers, blocking_read, blocking_write, expected) in cases {
        let options = QueueOptions::default()
            .with_concurrent_readers(readers)
            .with_concurrent_writers(writers)
            .with_blocking_read(blocking_read)
            .with_blocking_write(blocking_write);
        assert_eq!(options.kind(), expected, "{:?}", options);
    }
}

#[test]
fn test_deserialize_with_defaults() {
    let options: QueueOptions =
        serde_json::from_str(r#"{ "concurrent_writers": true }"#).unwrap();

    assert_eq!(options.capacity, DEFAULT_QUEUE_CAPACITY);
    assert!(options.concurrent_writers);
    assert!(!options.supports_blocking_read);
    assert_eq!(options.kind(), QueueKind::Mpmc);
}

#[test]
fn test_serialize_kind_snake_case() {
    assert_eq!(serde_json::to_string(&QueueKind::Spsc).unwrap(), r#""spsc""#);
    let kind: QueueKind = serde_json::from_str(r#""mpmc""#).unwrap();
    assert_eq!(kind, QueueKind::Mpmc);
}

#[test]
fn test_build_rejects_zero_capacity() {
    for options in [QueueOptions::spsc(0), QueueOptions::mpmc(0)] {
        assert!(matches!(
            options.build::<u32>(),
            Err(QueueError::InvalidCapacity(0))
        ));
    }
}

#[test]
fn test_built_spsc_behaves_as_spsc() {
    let mut queue = QueueOptions::spsc(4).build::<u32>().unwrap();
    assert_eq!(queue.kind(), QueueKind::Spsc);
    assert_eq!(queue.capacity(), 4);

    for i in 0..3 {
        queue.try_enqueue(i).unwrap();
    }
    assert!(queue.try_enqueue(3).is_err());
    assert!(matches!(
        queue.try_dequeue_for(Duration::from_millis(10)),
        Err(QueueError::Unsupported(_))
    ));

    let spsc = queue.as_spsc_mut().unwrap();
    let (_, mut consumer) = spsc.split();
    assert_eq!(consumer.try_dequeue(), Ok(0));
}

#[test]
fn test_built_mpmc_shared_across_threads() {
    let queue = QueueOptions::mpmc(2).build::<u32>().unwrap();
    assert_eq!(queue.kind(), QueueKind::Mpmc);
    let queue = Arc::new(queue.into_mpmc().unwrap());

    let reader = {
        let queue = queue.clone();
        thread::spawn(move || queue.try_dequeue_for(Duration::from_secs(2)))
    };

    queue.try_enqueue_for(9, Duration::from_secs(1)).unwrap();
    assert_eq!(reader.join().unwrap(), Ok(9));
}

#[test]
fn test_generic_over_capabilities() {
    fn round_trip<Q>(queue: &Q) -> Result<u8, QueueError>
    where
        Q: NonblockingQueue<u8> + BlockingReadQueue<u8>,
    {
        queue.try_enqueue(5).map_err(QueueError::from)?;
        queue.try_dequeue_for(Duration::from_millis(10))
    }

    let mpmc = BoundedQueue::new(QueueKind::Mpmc, 1).unwrap();
    assert_eq!(round_trip(&mpmc), Ok(5));

    let spsc = BoundedQueue::new(QueueKind::Spsc, 2).unwrap();
    assert!(matches!(round_trip(&spsc), Err(QueueError::Unsupported(_))));
}
