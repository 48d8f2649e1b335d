//! Translation fetch metrics.
//!
//! Counts how translation fetches settle so the HTTP API can report on the
//! health of the localization platform.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Global translation metrics singleton.
pub struct TranslationMetrics {
    /// Fetches started (one per selection change)
    fetches: AtomicUsize,

    /// Fetches that returned at least one entry
    loaded: AtomicUsize,

    /// Fetches that succeeded with zero entries
    empty: AtomicUsize,

    /// Fetches that failed at transport or API level
    failures: AtomicUsize,

    /// Settled fetches whose result was dropped because a newer selection existed
    stale_discarded: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<TranslationMetrics> = OnceLock::new();

impl TranslationMetrics {
    /// Get the global translation metrics instance.
    pub fn global() -> &'static TranslationMetrics {
        METRICS.get_or_init(|| TranslationMetrics {
            fetches: AtomicUsize::new(0),
            loaded: AtomicUsize::new(0),
            empty: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            stale_discarded: AtomicUsize::new(0),
        })
    }

    pub fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_loaded(&self) {
        self.loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty(&self) {
        self.empty.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale(&self) {
        self.stale_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn loaded(&self) -> usize {
        self.loaded.load(Ordering::Relaxed)
    }

    pub fn empty(&self) -> usize {
        self.empty.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn stale_discarded(&self) -> usize {
        self.stale_discarded.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    ///
    /// The success rate counts empty results as successes: the platform
    /// answered, it just had nothing for that language.
    pub fn report(&self) -> MetricsReport {
        let fetches = self.fetches();
        let loaded = self.loaded();
        let empty = self.empty();
        let failures = self.failures();

        let settled = loaded + empty + failures;
        let success_rate = if settled > 0 {
            ((loaded + empty) as f64 / settled as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            fetches,
            loaded,
            empty,
            failures,
            stale_discarded: self.stale_discarded(),
            success_rate,
        }
    }

    /// Reset all metrics to zero (useful for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        self.fetches.store(0, Ordering::Relaxed);
        self.loaded.store(0, Ordering::Relaxed);
        self.empty.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.stale_discarded.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of the translation fetch counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub fetches: usize,
    pub loaded: usize,
    pub empty: usize,
    pub failures: usize,
    pub stale_discarded: usize,

    /// Share of settled fetches that reached the platform successfully (0-100)
    pub success_rate: f64,
}
