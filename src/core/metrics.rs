//! Logger metrics for observability
//!
//! Counters describing what happened to log calls: how many were stored,
//! filtered by level, evicted by the history cap, or failed to persist.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rftip_client::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_logged();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.total_logged(), 1);
/// assert_eq!(metrics.filtered_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Entries appended to the history
    total_logged: AtomicU64,

    /// Calls dropped because they were below the minimum level
    filtered_count: AtomicU64,

    /// Entries evicted from the history to respect the capacity
    evicted_count: AtomicU64,

    /// Failed writes to the persistence layer
    persistence_failures: AtomicU64,

    /// Console or custom appender failures (errors and panics)
    appender_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            filtered_count: AtomicU64::new(0),
            evicted_count: AtomicU64::new(0),
            persistence_failures: AtomicU64::new(0),
            appender_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn evicted_count(&self) -> u64 {
        self.evicted_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn persistence_failures(&self) -> u64 {
        self.persistence_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn appender_failures(&self) -> u64 {
        self.appender_failures.load(Ordering::Relaxed)
    }

    /// Record an appended entry, returning the previous count
    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_evicted(&self, count: u64) -> u64 {
        self.evicted_count.fetch_add(count, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_persistence_failure(&self) -> u64 {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_appender_failure(&self) -> u64 {
        self.appender_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.filtered_count.store(0, Ordering::Relaxed);
        self.evicted_count.store(0, Ordering::Relaxed);
        self.persistence_failures.store(0, Ordering::Relaxed);
        self.appender_failures.store(0, Ordering::Relaxed);
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
            total_logged: AtomicU64::new(self.total_logged()),
            filtered_count: AtomicU64::new(self.filtered_count()),
            evicted_count: AtomicU64::new(self.evicted_count()),
            persistence_failures: AtomicU64::new(self.persistence_failures()),
            appender_failures: AtomicU64::new(self.appender_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.filtered_count(), 0);
        assert_eq!(metrics.evicted_count(), 0);
        assert_eq!(metrics.persistence_failures(), 0);
        assert_eq!(metrics.appender_failures(), 0);
    }

    #[test]
    fn test_metrics_record_returns_previous() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_logged(), 0);
        assert_eq!(metrics.record_logged(), 1);
        assert_eq!(metrics.total_logged(), 2);

        metrics.record_evicted(3);
        metrics.record_evicted(2);
        assert_eq!(metrics.evicted_count(), 5);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_logged();
        metrics.record_persistence_failure();
        metrics.record_appender_failure();

        metrics.reset();

        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.persistence_failures(), 0);
        assert_eq!(metrics.appender_failures(), 0);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_filtered();

        let snapshot = metrics.clone();
        metrics.record_filtered();

        assert_eq!(snapshot.filtered_count(), 1);
        assert_eq!(metrics.filtered_count(), 2);
    }
}
