//! Logger metrics for observability
//!
//! Counters for how many records reached the queue, how many pushes
//! failed, and how many were captured in dry-run mode.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use radis_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_pushed();
/// metrics.record_failed();
///
/// assert_eq!(metrics.pushed_count(), 1);
/// assert_eq!(metrics.failed_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records accepted by the queue
    pushed_count: AtomicU64,

    /// Records the queue refused or that could not be sent
    failed_count: AtomicU64,

    /// Records kept locally because dry-run mode was on
    captured_count: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            pushed_count: AtomicU64::new(0),
            failed_count: AtomicU64::new(0),
            captured_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn pushed_count(&self) -> u64 {
        self.pushed_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_count(&self) -> u64 {
        self.failed_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn captured_count(&self) -> u64 {
        self.captured_count.load(Ordering::Relaxed)
    }

    /// Record a successful push, returning the previous count
    #[inline]
    pub fn record_pushed(&self) -> u64 {
        self.pushed_count.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a failed push, returning the previous count
    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed_count.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a dry-run capture, returning the previous count
    #[inline]
    pub fn record_captured(&self) -> u64 {
        self.captured_count.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.pushed_count(), 0);
        assert_eq!(metrics.failed_count(), 0);
        assert_eq!(metrics.captured_count(), 0);
    }

    #[test]
    fn test_metrics_record_pushed_and_captured() {
        let metrics = LoggerMetrics::new();
        metrics.record_pushed();
        metrics.record_captured();
        metrics.record_captured();
        assert_eq!(metrics.pushed_count(), 1);
        assert_eq!(metrics.captured_count(), 2);
        assert_eq!(metrics.failed_count(), 0);
    }

    #[test]
    fn test_metrics_record_failed() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_failed(), 0); // Returns previous value
        assert_eq!(metrics.failed_count(), 1);
        metrics.record_failed();
        assert_eq!(metrics.failed_count(), 2);
    }
}
