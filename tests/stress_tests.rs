//! Stress tests for concurrent use
//!
//! These tests verify:
//! - Forked loggers on separate threads never interfere
//! - A logger shared behind the caller's lock loses no records
//! - Stateful producers run exactly once per log call under load

use parking_lot::Mutex;
use radis_logger::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

fn base_logger(queue: &MemoryQueue) -> Logger {
    Logger::builder()
        .publisher(queue.clone())
        .metadata(NoMetadata)
        .build()
        .expect("Failed to build logger")
}

#[test]
fn test_forked_loggers_on_threads() {
    let queue = MemoryQueue::new();
    let logger = base_logger(&queue);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let mut forked = logger.fork(format!("queue-{}", t)).expect("fork failed");
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    assert!(forked.info(format!("thread {} message {}", t, i), Context::new()));
                }
                forked.metrics().pushed_count()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), PER_THREAD as u64);
    }

    for t in 0..THREADS {
        let messages = queue.drain(&format!("queue-{}", t));
        assert_eq!(messages.len(), PER_THREAD);

        // oldest first, in the order the thread logged them
        for (i, json) in messages.iter().enumerate() {
            let msg: Value = serde_json::from_str(json).unwrap();
            assert_eq!(msg["short_message"], format!("thread {} message {}", t, i));
        }
    }
}

#[test]
fn test_shared_logger_behind_lock() {
    let queue = MemoryQueue::new();
    let calls = Arc::new(AtomicI64::new(0));

    let mut logger = base_logger(&queue);
    let counter = Arc::clone(&calls);
    logger.set_default(
        "seq",
        ContextValue::producer(move || counter.fetch_add(1, Ordering::SeqCst)),
    );
    let logger = Arc::new(Mutex::new(logger));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger
                        .lock()
                        .info(format!("{}-{}", t, i), context! { "thread" => t as i64 });
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let total = THREADS * PER_THREAD;
    assert_eq!(calls.load(Ordering::SeqCst), total as i64);
    assert_eq!(logger.lock().metrics().pushed_count(), total as u64);

    let messages = queue.drain("graylog-radis");
    assert_eq!(messages.len(), total);

    // every producer value shows up once
    let seqs: HashSet<i64> = messages
        .iter()
        .map(|json| serde_json::from_str::<Value>(json).unwrap()["_seq"].as_i64().unwrap())
        .collect();
    assert_eq!(seqs.len(), total);
}
