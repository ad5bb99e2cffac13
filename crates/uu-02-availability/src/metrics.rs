//! Metrics hooks for availability operations
//!
//! Counts how often the filter short-circuits a check, how often the store is
//! consulted, and how many of those consultations were false positives.
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//! use uu_02_availability::metrics::{AvailabilityMetrics, MetricsRecorder};
//! use uu_02_availability::Resolution;
//!
//! let metrics = AvailabilityMetrics::new();
//! metrics.record_check(Resolution::FilterMiss, Duration::from_micros(3));
//! assert_eq!(metrics.snapshot().filter_misses, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::Resolution;

/// Thread-safe counters for the availability resolver
#[derive(Default)]
pub struct AvailabilityMetrics {
    /// Checks that reached a decision
    pub checks: AtomicU64,
    /// Checks answered by the filter alone
    pub filter_misses: AtomicU64,
    /// Checks where the store confirmed the username exists
    pub store_confirmed: AtomicU64,
    /// Checks where the filter over-reported
    pub false_positives: AtomicU64,
    /// Successful claims
    pub claims: AtomicU64,
    /// Claims rejected because the username exists
    pub conflicts: AtomicU64,
    /// Store calls that failed or timed out
    pub store_errors: AtomicU64,
    /// Requests rejected for blank input
    pub invalid_inputs: AtomicU64,
    /// Cumulative check time in nanoseconds
    pub check_time_ns: AtomicU64,
    /// Cumulative claim time in nanoseconds
    pub claim_time_ns: AtomicU64,
}

impl AvailabilityMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_check(&self, resolution: Resolution, duration: Duration) {
        self.checks.fetch_add(1, Ordering::Relaxed);
        self.check_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        let counter = match resolution {
            Resolution::FilterMiss => &self.filter_misses,
            Resolution::StoreConfirmed => &self.store_confirmed,
            Resolution::FalsePositive => &self.false_positives,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_claim(&self, duration: Duration) {
        self.claims.fetch_add(1, Ordering::Relaxed);
        self.claim_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_conflict(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_error(&self) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid_input(&self) {
        self.invalid_inputs.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let checks = self.checks.load(Ordering::Relaxed);
        let claims = self.claims.load(Ordering::Relaxed);
        MetricsSnapshot {
            checks,
            filter_misses: self.filter_misses.load(Ordering::Relaxed),
            store_confirmed: self.store_confirmed.load(Ordering::Relaxed),
            false_positives: self.false_positives.load(Ordering::Relaxed),
            claims,
            conflicts: self.conflicts.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
            invalid_inputs: self.invalid_inputs.load(Ordering::Relaxed),
            avg_check_ns: average(self.check_time_ns.load(Ordering::Relaxed), checks),
            avg_claim_ns: average(self.claim_time_ns.load(Ordering::Relaxed), claims),
        }
    }

    /// Share of store lookups that turned out to be false positives.
    ///
    /// Only checks that reached the store are counted, so this estimates the
    /// filter's real false positive rate among non-members that hit.
    pub fn observed_false_positive_rate(&self) -> f64 {
        let fp = self.false_positives.load(Ordering::Relaxed);
        let confirmed = self.store_confirmed.load(Ordering::Relaxed);
        if fp + confirmed == 0 {
            0.0
        } else {
            fp as f64 / (fp + confirmed) as f64
        }
    }

    /// Share of checks answered without a store round-trip
    pub fn store_bypass_rate(&self) -> f64 {
        let checks = self.checks.load(Ordering::Relaxed);
        if checks == 0 {
            0.0
        } else {
            self.filter_misses.load(Ordering::Relaxed) as f64 / checks as f64
        }
    }
}

fn average(total: u64, count: u64) -> u64 {
    if count > 0 {
        total / count
    } else {
        0
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub checks: u64,
    pub filter_misses: u64,
    pub store_confirmed: u64,
    pub false_positives: u64,
    pub claims: u64,
    pub conflicts: u64,
    pub store_errors: u64,
    pub invalid_inputs: u64,
    pub avg_check_ns: u64,
    pub avg_claim_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this to forward counters to an external metrics system.
pub trait MetricsRecorder: Send + Sync {
    fn record_check(&self, resolution: Resolution, duration: Duration);
    fn record_claim(&self, duration: Duration);
    fn record_conflict(&self);
    fn record_store_error(&self);
    fn record_invalid_input(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_check(&self, _: Resolution, _: Duration) {}
    fn record_claim(&self, _: Duration) {}
    fn record_conflict(&self) {}
    fn record_store_error(&self) {}
    fn record_invalid_input(&self) {}
}

impl MetricsRecorder for AvailabilityMetrics {
    fn record_check(&self, resolution: Resolution, duration: Duration) {
        AvailabilityMetrics::record_check(self, resolution, duration);
    }

    fn record_claim(&self, duration: Duration) {
        AvailabilityMetrics::record_claim(self, duration);
    }

    fn record_conflict(&self) {
        AvailabilityMetrics::record_conflict(self);
    }

    fn record_store_error(&self) {
        AvailabilityMetrics::record_store_error(self);
    }

    fn record_invalid_input(&self) {
        AvailabilityMetrics::record_invalid_input(self);
    }
}
