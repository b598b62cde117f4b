//! In-process queue
//!
//! Behaves like a list on a queue server: pushes go to the head, the oldest
//! entry sits at the tail. Clones and forks share the same storage, the
//! way two connections to one server see the same lists.

use crate::core::{LoggerError, QueuePublisher, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

pub const MEMORY_TARGET: &str = "memory";

#[derive(Debug, Default)]
struct Lists {
    queues: HashMap<String, VecDeque<String>>,
    rejecting: bool,
}

/// Queue held in memory
///
/// # Example
///
/// ```
/// use radis_logger::queue::MemoryQueue;
/// use radis_logger::QueuePublisher;
///
/// let mut queue = MemoryQueue::new();
/// queue.push("logs", "first").unwrap();
/// queue.push("logs", "second").unwrap();
///
/// assert_eq!(queue.pop_oldest("logs").as_deref(), Some("first"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryQueue {
    lists: Arc<Mutex<Lists>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following push fail until switched off again
    pub fn set_rejecting(&self, rejecting: bool) {
        self.lists.lock().rejecting = rejecting;
    }

    /// Remove and return the oldest entry of `queue`
    pub fn pop_oldest(&self, queue: &str) -> Option<String> {
        self.lists.lock().queues.get_mut(queue)?.pop_back()
    }

    /// Remove every entry of `queue`, oldest first
    pub fn drain(&self, queue: &str) -> Vec<String> {
        self.lists
            .lock()
            .queues
            .get_mut(queue)
            .map(|list| list.drain(..).rev().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, queue: &str) -> usize {
        self.lists.lock().queues.get(queue).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self, queue: &str) -> bool {
        self.len(queue) == 0
    }
}

impl QueuePublisher for MemoryQueue {
    fn push(&mut self, queue: &str, payload: &str) -> Result<()> {
        let mut lists = self.lists.lock();
        if lists.rejecting {
            return Err(LoggerError::rejected(queue, "memory queue is rejecting pushes"));
        }
        lists
            .queues
            .entry(queue.to_string())
            .or_default()
            .push_front(payload.to_string());
        Ok(())
    }

    fn fork(&self) -> Result<Box<dyn QueuePublisher>> {
        Ok(Box::new(self.clone()))
    }

    fn target(&self) -> &str {
        MEMORY_TARGET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = MemoryQueue::new();
        queue.push("q", "a").unwrap();
        queue.push("q", "b").unwrap();
        queue.push("q", "c").unwrap();

        assert_eq!(queue.len("q"), 3);
        assert_eq!(queue.pop_oldest("q").as_deref(), Some("a"));
        assert_eq!(queue.drain("q"), ["b", "c"]);
        assert!(queue.is_empty("q"));
    }

    #[test]
    fn test_queues_are_separate() {
        let mut queue = MemoryQueue::new();
        queue.push("one", "x").unwrap();

        assert_eq!(queue.len("one"), 1);
        assert_eq!(queue.len("two"), 0);
        assert_eq!(queue.pop_oldest("two"), None);
    }

    #[test]
    fn test_rejecting() {
        let mut queue = MemoryQueue::new();
        queue.set_rejecting(true);

        let err = queue.push("q", "x").unwrap_err();
        assert!(matches!(err, LoggerError::QueueRejected { .. }));
        assert!(queue.is_empty("q"));

        queue.set_rejecting(false);
        assert!(queue.push("q", "x").is_ok());
    }

    #[test]
    fn test_fork_shares_storage() {
        let queue = MemoryQueue::new();
        let mut forked = queue.fork().unwrap();
        forked.push("q", "from fork").unwrap();

        assert_eq!(forked.target(), MEMORY_TARGET);
        assert_eq!(queue.pop_oldest("q").as_deref(), Some("from fork"));
    }
}
