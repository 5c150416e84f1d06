//! Shape cache statistics.
//!
//! Counters are updated with relaxed atomics on the lookup path; they are
//! diagnostic and never drive behavior.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters owned by a [`ShapeCache`](crate::ShapeCache).
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Lookups that returned a live descriptor.
    hits: AtomicU64,
    /// Lookups that found nothing usable.
    misses: AtomicU64,
    /// Descriptors constructed by the generator.
    shapes_built: AtomicU64,
    /// Entries found dead on lookup (descriptor already dropped).
    evicted: AtomicU64,
    /// Publishes that lost to a concurrently published descriptor.
    races_lost: AtomicU64,
    /// Hits whose property set disagreed with the request.
    collisions: AtomicU64,
    /// Dead entries removed by sweeps.
    purged: AtomicU64,
}

impl CacheStats {
    /// Create zeroed statistics.
    pub const fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            shapes_built: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
            races_lost: AtomicU64::new(0),
            collisions: AtomicU64::new(0),
            purged: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_build(&self) {
        self.shapes_built.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_eviction(&self) {
        self.evicted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_race_lost(&self) {
        self.races_lost.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_collision(&self) {
        self.collisions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_purge(&self, removed: usize) {
        self.purged.fetch_add(removed as u64, Ordering::Relaxed);
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            shapes_built: self.shapes_built.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            races_lost: self.races_lost.load(Ordering::Relaxed),
            collisions: self.collisions.load(Ordering::Relaxed),
            purged: self.purged.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.shapes_built.store(0, Ordering::Relaxed);
        self.evicted.store(0, Ordering::Relaxed);
        self.races_lost.store(0, Ordering::Relaxed);
        self.collisions.store(0, Ordering::Relaxed);
        self.purged.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub shapes_built: u64,
    pub evicted: u64,
    pub races_lost: u64,
    pub collisions: u64,
    pub purged: u64,
}

impl CacheStatsSnapshot {
    /// Fraction of lookups that hit, in `[0.0, 1.0]`.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}
