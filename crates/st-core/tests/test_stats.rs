//! Integration tests for the injected statistics counters.

use std::sync::Arc;
use std::thread;

use approx::assert_relative_eq;
use st_core::{CacheStats, CheckerStats};

#[test]
fn separate_instances_do_not_share_counts() {
    let a = CacheStats::default();
    let b = CacheStats::default();
    a.hits.incr();
    a.hits.incr();
    a.misses.incr();
    assert_eq!(a.snapshot(0).hits, 2);
    assert_eq!(b.snapshot(0).hits, 0);
    assert_relative_eq!(a.snapshot(0).hit_rate(), 2.0 / 3.0);
    assert_relative_eq!(b.snapshot(0).hit_rate(), 0.0);
}

#[test]
fn counters_survive_parallel_increments() {
    let stats = Arc::new(CheckerStats::default());
    let workers: Vec<_> = (0..8)
        .map(|_| {
            let stats = stats.clone();
            thread::spawn(move || {
                for _ in 0..1_000 {
                    stats.business_days_found.incr();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(stats.snapshot().business_days_found, 8_000);
    stats.reset();
    assert_eq!(stats.snapshot(), Default::default());
}
