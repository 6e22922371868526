//! Service health counters.
//!
//! Counters are updated from the service loop and from detached delivery
//! tasks, so they are plain atomics behind an `Arc`.
//!
//! # Example
//!
//! ```
//! use agri_sentinel::metrics::ServiceMetrics;
//!
//! let metrics = ServiceMetrics::new();
//! metrics.record_tick(1);
//! metrics.record_notification(true);
//! metrics.record_notification(false);
//!
//! let summary = metrics.summary();
//! assert_eq!(summary.ticks, 1);
//! assert_eq!(summary.alerts_raised, 1);
//! assert_eq!(summary.notifications_sent, 1);
//! assert_eq!(summary.notifications_failed, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time copy of the service counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Samples processed by the monitoring loop.
    pub ticks: u64,
    /// Lines rejected by validation.
    pub lines_rejected: u64,
    /// Transport errors from the sample source.
    pub ingest_errors: u64,
    /// Alert events raised by the debouncers.
    pub alerts_raised: u64,
    /// Alert notifications delivered.
    pub notifications_sent: u64,
    /// Alert notifications that failed.
    pub notifications_failed: u64,
    /// Telemetry forwards that failed.
    pub telemetry_failures: u64,
}

/// Thread-safe service counters.
#[derive(Debug, Default)]
pub struct ServiceMetrics {
    ticks: AtomicU64,
    lines_rejected: AtomicU64,
    ingest_errors: AtomicU64,
    alerts_raised: AtomicU64,
    notifications_sent: AtomicU64,
    notifications_failed: AtomicU64,
    telemetry_failures: AtomicU64,
}

impl ServiceMetrics {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a processed tick and the alert events it raised.
    pub fn record_tick(&self, alerts: usize) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        self.alerts_raised.fetch_add(alerts as u64, Ordering::Relaxed);
    }

    /// Record a line rejected by validation.
    pub fn record_rejected_line(&self) {
        self.lines_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a transport error.
    pub fn record_ingest_error(&self) {
        self.ingest_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a notification outcome.
    pub fn record_notification(&self, delivered: bool) {
        let counter = if delivered {
            &self.notifications_sent
        } else {
            &self.notifications_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed telemetry forward.
    pub fn record_telemetry_failure(&self) {
        self.telemetry_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters.
    #[must_use]
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            ticks: self.ticks.load(Ordering::Relaxed),
            lines_rejected: self.lines_rejected.load(Ordering::Relaxed),
            ingest_errors: self.ingest_errors.load(Ordering::Relaxed),
            alerts_raised: self.alerts_raised.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            notifications_failed: self.notifications_failed.load(Ordering::Relaxed),
            telemetry_failures: self.telemetry_failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_is_zeroed() {
        assert_eq!(ServiceMetrics::new().summary(), MetricsSummary::default());
    }

    #[test]
    fn test_counters() {
        let metrics = ServiceMetrics::new();
        metrics.record_tick(0);
        metrics.record_tick(2);
        metrics.record_rejected_line();
        metrics.record_ingest_error();
        metrics.record_telemetry_failure();

        let summary = metrics.summary();
        assert_eq!(summary.ticks, 2);
        assert_eq!(summary.alerts_raised, 2);
        assert_eq!(summary.lines_rejected, 1);
        assert_eq!(summary.ingest_errors, 1);
        assert_eq!(summary.telemetry_failures, 1);
    }

    #[test]
    fn test_concurrent_updates() {
        let metrics = Arc::new(ServiceMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        metrics.record_notification(true);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(metrics.summary().notifications_sent, 8_000);
    }

    #[test]
    fn test_summary_serializes() {
        let json = serde_json::to_value(MetricsSummary::default()).unwrap();
        assert_eq!(json["telemetry_failures"], 0);
    }
}
