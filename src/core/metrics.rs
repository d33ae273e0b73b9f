//! Logger metrics for observability
//!
//! Counters for records delivered, records with at least one failing
//! backend, and individual backend failures. Disabled levels never touch
//! these counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rust_field_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_written();
/// metrics.record_failed(2);
///
/// assert_eq!(metrics.records_written(), 1);
/// assert_eq!(metrics.records_failed(), 1);
/// assert_eq!(metrics.backend_failures(), 2);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records delivered to every backend of their level
    records_written: AtomicU64,

    /// Records where at least one backend failed
    records_failed: AtomicU64,

    /// Individual backend write failures
    backend_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU64::new(0),
            records_failed: AtomicU64::new(0),
            backend_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_failed(&self) -> u64 {
        self.records_failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn backend_failures(&self) -> u64 {
        self.backend_failures.load(Ordering::Relaxed)
    }

    /// Record a fully delivered record
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.records_written.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a record that `failed_backends` backends could not accept
    #[inline]
    pub fn record_failed(&self, failed_backends: usize) -> u64 {
        self.backend_failures
            .fetch_add(failed_backends as u64, Ordering::Relaxed);
        self.records_failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Get failure rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no records have been processed.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.records_failed() as f64;
        let total = self.records_written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.records_written.store(0, Ordering::Relaxed);
        self.records_failed.store(0, Ordering::Relaxed);
        self.backend_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_written: AtomicU64::new(self.records_written()),
            records_failed: AtomicU64::new(self.records_failed()),
            backend_failures: AtomicU64::new(self.backend_failures()),
        }
    }
}
