//! Publisher trait for queue destinations

use super::error::Result;

/// Producer side of a reliable queue
///
/// Implementations push one serialized record per call. Delivery beyond
/// "the queue accepted it" is the collector's business. Calls take
/// `&mut self`, so a publisher only has to be `Send`.
pub trait QueuePublisher: Send {
    /// Push `payload` onto the list named `queue`
    fn push(&mut self, queue: &str, payload: &str) -> Result<()>;

    /// Open an independent publisher to the same target
    fn fork(&self) -> Result<Box<dyn QueuePublisher>>;

    /// Where records go, e.g. `localhost:6379`
    fn target(&self) -> &str;
}
