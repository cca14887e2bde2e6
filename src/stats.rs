//! Engine statistics.
//!
//! Per-engine atomic counters; no process-wide singletons, so multiple
//! engines coexist without interference. Counters are updated with
//! relaxed ordering: totals must be exact, but cross-counter ordering
//! is unobservable through the snapshot API.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::result::StatsSnapshot;

#[derive(Debug, Default)]
pub(crate) struct Stats {
    total_processed: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    errors: AtomicU64,
    /// Cumulative pipeline time, nanoseconds, actual runs only.
    total_nanos: AtomicU64,
    /// Number of actual pipeline runs backing `total_nanos`.
    runs: AtomicU64,
}

impl Stats {
    /// A lookup answered from the cache.
    pub fn record_hit(&self) {
        self.total_processed.fetch_add(1, Ordering::Relaxed);
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A lookup that has to run the pipeline.
    pub fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// A successful pipeline run. Only these contribute to the average
    /// processing time; cache hits cost no pipeline time.
    pub fn record_success(&self, duration: Duration) {
        self.total_processed.fetch_add(1, Ordering::Relaxed);
        self.runs.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    /// A failed extraction attempt, timeouts included.
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time snapshot. Individual counters are exact; the
    /// snapshot is not atomic across fields.
    pub fn snapshot(&self) -> StatsSnapshot {
        let total_nanos = self.total_nanos.load(Ordering::Relaxed);
        let runs = self.runs.load(Ordering::Relaxed);
        let avg_nanos = if runs == 0 { 0 } else { total_nanos / runs };

        StatsSnapshot {
            total_processed: self.total_processed.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            total_processing_time: Duration::from_nanos(total_nanos),
            avg_processing_time: Duration::from_nanos(avg_nanos),
        }
    }

    /// Zero every counter.
    pub fn reset(&self) {
        self.total_processed.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
        self.total_nanos.store(0, Ordering::Relaxed);
        self.runs.store(0, Ordering::Relaxed);
    }
}
