//! Statistics counters shared between components.
//!
//! Counters are injected into each component at construction (as
//! `Arc<CacheStats>` / `Arc<CheckerStats>`), so independent engine instances
//! and parallel tests never observe each other's numbers.  Increments use
//! relaxed atomics: values may lag under true parallelism but reads and
//! writes never block.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter that can be reset by an operator.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    /// Add one.
    pub fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value.
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Set back to zero.
    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

/// Holiday cache counters.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Lookups answered from a live entry.
    pub hits: Counter,
    /// Lookups that found nothing (or only an expired entry).
    pub misses: Counter,
    /// Successful writes.
    pub sets: Counter,
    /// Entries removed by an explicit delete.
    pub deletes: Counter,
    /// Rejected writes and fetch failures seen by the cache.
    pub errors: Counter,
}

impl CacheStats {
    /// Take a point-in-time copy, attaching the current live key count.
    pub fn snapshot(&self, keys: usize) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.get(),
            misses: self.misses.get(),
            sets: self.sets.get(),
            deletes: self.deletes.get(),
            errors: self.errors.get(),
            keys,
        }
    }

    /// Zero every counter.
    pub fn reset(&self) {
        self.hits.reset();
        self.misses.reset();
        self.sets.reset();
        self.deletes.reset();
        self.errors.reset();
        tracing::info!("holiday cache statistics reset");
    }
}

/// Read-only copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStatsSnapshot {
    /// Cache hits.
    pub hits: u64,
    /// Cache misses.
    pub misses: u64,
    /// Successful writes.
    pub sets: u64,
    /// Explicit deletes.
    pub deletes: u64,
    /// Errors.
    pub errors: u64,
    /// Live keys at snapshot time.
    pub keys: usize,
}

impl CacheStatsSnapshot {
    /// Fraction of lookups that hit, in `[0, 1]`.  Zero when nothing has
    /// been looked up yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Business-day checker counters.
#[derive(Debug, Default)]
pub struct CheckerStats {
    /// Holiday lookups that answered "holiday" from real data.
    pub holidays_found: Counter,
    /// Business-day evaluations that answered "business day".
    pub business_days_found: Counter,
    /// Fallbacks taken because data was unavailable, and internal errors.
    pub errors: Counter,
}

impl CheckerStats {
    /// Take a point-in-time copy.
    pub fn snapshot(&self) -> CheckerStatsSnapshot {
        CheckerStatsSnapshot {
            holidays_found: self.holidays_found.get(),
            business_days_found: self.business_days_found.get(),
            errors: self.errors.get(),
        }
    }

    /// Zero every counter.
    pub fn reset(&self) {
        self.holidays_found.reset();
        self.business_days_found.reset();
        self.errors.reset();
        tracing::info!("business-day checker statistics reset");
    }
}

/// Read-only copy of [`CheckerStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckerStatsSnapshot {
    /// Holidays found.
    pub holidays_found: u64,
    /// Business days found.
    pub business_days_found: u64,
    /// Errors and fallbacks.
    pub errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hit_rate_with_no_lookups_is_zero() {
        let stats = CacheStats::default();
        assert_eq!(stats.snapshot(0).hit_rate(), 0.0);
    }

    #[test]
    fn hit_rate_counts_hits_over_lookups() {
        let stats = CacheStats::default();
        stats.hits.incr();
        stats.hits.incr();
        stats.hits.incr();
        stats.misses.incr();
        let snap = stats.snapshot(2);
        assert_eq!(snap.keys, 2);
        assert_relative_eq!(snap.hit_rate(), 0.75);
    }

    #[test]
    fn reset_zeroes_counters() {
        let stats = CheckerStats::default();
        stats.errors.incr();
        stats.holidays_found.incr();
        stats.reset();
        assert_eq!(stats.snapshot(), CheckerStatsSnapshot::default());
    }
}
