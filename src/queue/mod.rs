//! Queue publisher implementations

pub mod memory;
pub mod redis;

pub use memory::MemoryQueue;
pub use redis::RedisQueue;

pub use crate::core::QueuePublisher;
