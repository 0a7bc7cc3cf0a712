//! Consumer metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Metrics for a single consumer
#[derive(Debug, Default)]
pub struct ConsumerMetrics {
    /// Current input queue length
    queue_len: AtomicUsize,
    /// Frames processed successfully
    processed_count: AtomicU64,
    /// `process` calls that returned an error
    failure_count: AtomicU64,
}

impl ConsumerMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    pub fn processed_count(&self) -> u64 {
        self.processed_count.load(Ordering::Relaxed)
    }

    pub fn inc_processed_count(&self) {
        self.processed_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queue_len: self.queue_len(),
            processed_count: self.processed_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of consumer metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queue_len: usize,
    pub processed_count: u64,
    pub failure_count: u64,
}
