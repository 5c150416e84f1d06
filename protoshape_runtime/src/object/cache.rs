//! Weakly-held shape cache.
//!
//! Maps [`ShapeKey`] to the descriptor built for it without keeping the
//! descriptor alive: entries are `Weak`, so a shape no instance or derived
//! shape references is freed, and the next lookup of its key misses.
//!
//! ## Concurrency
//!
//! - Lookups take a shard read lock and upgrade the weak reference.
//! - Publishing goes through the entry API, which holds the shard write lock
//!   for the key. If a live descriptor already occupies the key, that
//!   descriptor wins and the caller's candidate is discarded, so concurrent
//!   builders of one shape all converge on a single descriptor.
//! - Dead entries are swept once enough of them have been observed on
//!   lookup, or once inserts have grown the map past twice its live size at
//!   the last sweep (and past `purge_threshold`). Only one thread sweeps at a
//!   time.

use super::shape::ShapeDescriptor;
use crate::stats::CacheStats;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use protoshape_core::ShapeKey;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Concurrent `ShapeKey -> Weak<ShapeDescriptor>` map.
#[derive(Debug)]
pub struct ShapeCache {
    /// Published descriptors, held weakly.
    entries: DashMap<ShapeKey, Weak<ShapeDescriptor>, FxBuildHasher>,

    /// Dead entries observed since the last sweep.
    dead_seen: AtomicUsize,

    /// Dead observations that trigger a sweep, and the minimum map size
    /// before growth does.
    purge_threshold: usize,

    /// Live entries left by the last sweep.
    live_after_sweep: AtomicUsize,

    /// Held while sweeping.
    sweeping: Mutex<()>,

    /// Hit/miss/build counters.
    stats: CacheStats,
}

impl ShapeCache {
    /// Create a cache with default sizing.
    pub fn new() -> Self {
        Self::with_capacity(64, 256)
    }

    /// Create a cache with `capacity` pre-allocated entries that sweeps after
    /// `purge_threshold` dead entries were observed.
    pub fn with_capacity(capacity: usize, purge_threshold: usize) -> Self {
        Self {
            entries: DashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            dead_seen: AtomicUsize::new(0),
            purge_threshold: purge_threshold.max(1),
            live_after_sweep: AtomicUsize::new(0),
            sweeping: Mutex::new(()),
            stats: CacheStats::new(),
        }
    }

    /// Look up a live descriptor.
    ///
    /// A present-but-dead entry counts as an eviction and a miss.
    pub fn get(&self, key: &ShapeKey) -> Option<Arc<ShapeDescriptor>> {
        // The shard guard is released before any sweep below.
        let found = self.entries.get(key).map(|entry| entry.upgrade());
        match found {
            Some(Some(shape)) => {
                self.stats.record_hit();
                Some(shape)
            }
            Some(None) => {
                self.stats.record_eviction();
                self.stats.record_miss();
                self.note_dead();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Publish a freshly built descriptor and return the one now cached.
    ///
    /// If a live descriptor for the same shape is already cached it is
    /// returned instead of `shape`. A live descriptor under the same key but
    /// with a different property set (a digest collision) is left in place
    /// and `shape` is returned uncached.
    pub fn publish(&self, shape: Arc<ShapeDescriptor>) -> Arc<ShapeDescriptor> {
        let (published, inserted) = match self.entries.entry(shape.key()) {
            Entry::Occupied(mut slot) => {
                let current = slot.get().upgrade();
                match current {
                    Some(existing) if existing.same_shape(&shape) => {
                        self.stats.record_race_lost();
                        debug!(key = %shape.key(), "lost publish race, reusing cached shape");
                        (existing, false)
                    }
                    Some(_) => {
                        self.stats.record_collision();
                        (shape, false)
                    }
                    None => {
                        slot.insert(Arc::downgrade(&shape));
                        (shape, true)
                    }
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::downgrade(&shape));
                (shape, true)
            }
        };

        // The entry guard is gone; sweeping takes every shard lock.
        if inserted {
            self.note_growth();
        }
        published
    }

    /// Remove every dead entry. Returns how many were removed.
    pub fn purge(&self) -> usize {
        let _guard = self.sweeping.lock();
        self.sweep()
    }

    fn note_dead(&self) {
        let seen = self.dead_seen.fetch_add(1, Ordering::Relaxed) + 1;
        if seen >= self.purge_threshold {
            // Another thread already sweeping covers this observation.
            if let Some(_guard) = self.sweeping.try_lock() {
                self.sweep();
            }
        }
    }

    fn note_growth(&self) {
        let floor = self
            .live_after_sweep
            .load(Ordering::Relaxed)
            .saturating_mul(2)
            .max(self.purge_threshold);
        if self.entries.len() > floor {
            if let Some(_guard) = self.sweeping.try_lock() {
                self.sweep();
            }
        }
    }

    fn sweep(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, shape| {
            let alive = shape.strong_count() > 0;
            if !alive {
                removed += 1;
            }
            alive
        });
        self.dead_seen.store(0, Ordering::Relaxed);
        self.live_after_sweep.store(self.entries.len(), Ordering::Relaxed);
        self.stats.record_purge(removed);
        debug!(removed, remaining = self.entries.len(), "swept shape cache");
        removed
    }

    /// Number of entries, dead ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries whose descriptor is still alive.
    pub fn live_len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().strong_count() > 0)
            .count()
    }

    /// Drop every entry. Descriptors held elsewhere stay valid.
    pub fn clear(&self) {
        self.entries.clear();
        self.dead_seen.store(0, Ordering::Relaxed);
        self.live_after_sweep.store(0, Ordering::Relaxed);
    }

    /// Cache statistics.
    #[inline]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl Default for ShapeCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
