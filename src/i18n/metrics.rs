//! Translation metrics and observability module.
//!
//! Counters are owned by each `Translator` so that independent instances
//! (and tests) never share state.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters describing resource loading and key resolution.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Number of translation resources requested from a fetcher
    fetches: AtomicUsize,

    /// Number of requests that degraded to an empty map because of an error
    fetch_failures: AtomicUsize,

    /// Number of retries issued because a resource came back empty
    empty_retries: AtomicUsize,

    /// Number of lookups answered by one of the translation tiers
    resolved: AtomicUsize,

    /// Number of lookups that fell through to the raw key
    unresolved: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetch of a translation resource.
    pub fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fetch that failed and was degraded to an empty map.
    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a retry caused by an empty resource.
    pub fn record_empty_retry(&self) {
        self.empty_retries.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup answered by a translation tier.
    pub fn record_resolved(&self) {
        self.resolved.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that returned the raw key.
    pub fn record_unresolved(&self) {
        self.unresolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn fetch_failures(&self) -> usize {
        self.fetch_failures.load(Ordering::Relaxed)
    }

    pub fn empty_retries(&self) -> usize {
        self.empty_retries.load(Ordering::Relaxed)
    }

    pub fn resolved(&self) -> usize {
        self.resolved.load(Ordering::Relaxed)
    }

    pub fn unresolved(&self) -> usize {
        self.unresolved.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let resolved = self.resolved();
        let unresolved = self.unresolved();
        let lookups = resolved + unresolved;
        let resolution_rate = if lookups > 0 {
            (resolved as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        let fetches = self.fetches();
        let failures = self.fetch_failures();
        let fetch_success_rate = if fetches > 0 {
            (fetches.saturating_sub(failures) as f64 / fetches as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            fetches,
            fetch_failures: failures,
            fetch_success_rate,
            empty_retries: self.empty_retries(),
            resolved,
            unresolved,
            resolution_rate,
        }
    }
}

/// Metrics report containing current translation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of resource fetches
    pub fetches: usize,

    /// Number of fetches that degraded to an empty map
    pub fetch_failures: usize,

    /// Fetch success rate as a percentage (0-100)
    pub fetch_success_rate: f64,

    /// Number of retries caused by empty resources
    pub empty_retries: usize,

    /// Number of lookups answered by a tier
    pub resolved: usize,

    /// Number of lookups that returned the raw key
    pub unresolved: usize,

    /// Resolution rate as a percentage (0-100)
    pub resolution_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Counter Tests ====================

    #[test]
    fn test_record_fetch() {
        let metrics = TranslationMetrics::new();

        assert_eq!(metrics.fetches(), 0);
        metrics.record_fetch();
        metrics.record_fetch();
        assert_eq!(metrics.fetches(), 2);
    }

    #[test]
    fn test_record_fetch_failure() {
        let metrics = TranslationMetrics::new();

        metrics.record_fetch_failure();
        assert_eq!(metrics.fetch_failures(), 1);
    }

    #[test]
    fn test_record_empty_retry() {
        let metrics = TranslationMetrics::new();

        metrics.record_empty_retry();
        assert_eq!(metrics.empty_retries(), 1);
    }

    #[test]
    fn test_instances_are_independent() {
        let a = TranslationMetrics::new();
        let b = TranslationMetrics::new();

        a.record_resolved();
        assert_eq!(a.resolved(), 1);
        assert_eq!(b.resolved(), 0);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_empty() {
        let report = TranslationMetrics::new().report();

        assert_eq!(report.fetches, 0);
        assert_eq!(report.fetch_failures, 0);
        assert_eq!(report.fetch_success_rate, 0.0);
        assert_eq!(report.resolved, 0);
        assert_eq!(report.unresolved, 0);
        assert_eq!(report.resolution_rate, 0.0);
    }

    #[test]
    fn test_report_resolution_rate() {
        let metrics = TranslationMetrics::new();

        // 3 resolved, 1 unresolved = 75%
        metrics.record_resolved();
        metrics.record_resolved();
        metrics.record_resolved();
        metrics.record_unresolved();

        let report = metrics.report();
        assert_eq!(report.resolved, 3);
        assert_eq!(report.unresolved, 1);
        assert_eq!(report.resolution_rate, 75.0);
    }

    #[test]
    fn test_report_fetch_success_rate() {
        let metrics = TranslationMetrics::new();

        // 4 fetches, 1 failure = 75%
        for _ in 0..4 {
            metrics.record_fetch();
        }
        metrics.record_fetch_failure();

        let report = metrics.report();
        assert_eq!(report.fetches, 4);
        assert_eq!(report.fetch_failures, 1);
        assert_eq!(report.fetch_success_rate, 75.0);
    }

    #[test]
    fn test_report_serializes() {
        let metrics = TranslationMetrics::new();
        metrics.record_fetch();

        let json = serde_json::to_value(metrics.report()).unwrap();
        assert_eq!(json["fetches"], 1);
        assert_eq!(json["fetch_success_rate"], 100.0);
    }
}
