//! Cache statistics
//!
//! Counters are kept as atomics inside the store so that reading them never
//! contends with the cache lock. [`CacheStats`] is a plain snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of a cache's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently held
    pub entries: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// Lookups that found a value
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Successful `put` calls, including overwrites
    pub insertions: u64,
    /// Entries dropped to make room for new ones
    pub evictions: u64,
}

impl CacheStats {
    /// Total number of lookups
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups served from the cache, 0.0 when nothing was looked up
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.lookups();
        if lookups == 0 {
            return 0.0;
        }
        self.hits as f64 / lookups as f64
    }

    /// Check if the cache is holding as many entries as it may
    pub fn is_full(&self) -> bool {
        self.entries >= self.capacity
    }

    /// One-line summary for log and CLI output
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}/{} entries, {} hits, {} misses ({:.1}% hit rate), {} evictions",
            self.entries,
            self.capacity,
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.evictions
        );
        if self.is_full() {
            summary.push_str(", full");
        }
        summary
    }
}

/// Live counters shared by a store
#[derive(Debug, Default)]
pub(crate) struct StatCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
    evictions: AtomicU64,
}

impl StatCounters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insertion(&self) {
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, entries: usize, capacity: usize) -> CacheStats {
        CacheStats {
            entries,
            capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
