//! Shape generation.
//!
//! The generator turns property-name collections into canonical, memoized
//! [`ShapeDescriptor`]s. Identity depends only on the full property set:
//! `{a, b, c}` requested flat, in another order, or as `{a}` extended by
//! `{b, c}` all resolve to the same key, and to the same descriptor while
//! one is alive.
//!
//! ## Resolution
//!
//! ```text
//! extend(base, added)
//!   combined = base ∪ added
//!   combined == base        -> shape of `base`
//!   cache[key(combined)]    -> hit
//!   otherwise               -> shape of `base` (recursively), then layer
//!                              combined \ base on top and publish
//! ```
//!
//! The structural base is resolved by property set alone, never by which
//! object the caller extended, so every extension of the same base set
//! shares one base descriptor. Recursion ends at the empty set, which is the
//! root shape the generator holds for its whole lifetime.

use super::Prototype;
use super::cache::ShapeCache;
use super::shape::ShapeDescriptor;
use crate::config::{ConfigError, GeneratorConfig};
use crate::stats::CacheStatsSnapshot;
use protoshape_core::{PropertyName, PropertySet, ShapeKey};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Builds and memoizes shapes.
///
/// Each generator owns its own cache; shapes from different generators never
/// mix. The generator is `Sync` and meant to be shared across threads.
#[derive(Debug)]
pub struct ShapeGenerator {
    /// Weakly-held published shapes.
    cache: ShapeCache,

    /// The property-less root, held strongly and never cached.
    root: Arc<ShapeDescriptor>,

    config: GeneratorConfig,
}

impl ShapeGenerator {
    /// Create a generator with the default configuration.
    pub fn new() -> Self {
        Self::from_validated(GeneratorConfig::default())
    }

    /// Create a generator with a custom configuration.
    pub fn with_config(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: GeneratorConfig) -> Self {
        Self {
            cache: ShapeCache::with_capacity(config.initial_capacity, config.purge_threshold),
            root: ShapeDescriptor::root(),
            config,
        }
    }

    /// Get the active configuration.
    #[inline]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Get the root shape.
    #[inline]
    pub fn root(&self) -> &Arc<ShapeDescriptor> {
        &self.root
    }

    /// Shape whose properties are exactly `names`, layered on the root.
    ///
    /// An empty collection yields the root shape.
    pub fn generate<I, S>(&self, names: I) -> Arc<ShapeDescriptor>
    where
        I: IntoIterator<Item = S>,
        S: Into<PropertyName>,
    {
        self.generate_set(&PropertySet::new(names))
    }

    /// Shape with `base_names ∪ new_names`, layered on the shape of
    /// `base_names`.
    pub fn generate_extended<B, SB, N, SN>(&self, base_names: B, new_names: N) -> Arc<ShapeDescriptor>
    where
        B: IntoIterator<Item = SB>,
        SB: Into<PropertyName>,
        N: IntoIterator<Item = SN>,
        SN: Into<PropertyName>,
    {
        self.extend_set(&PropertySet::new(base_names), &PropertySet::new(new_names))
    }

    /// Shape of `base` extended with `new_names`.
    ///
    /// `base` may be a shape, an instance, or anything else exposing its full
    /// property names.
    pub fn derive<P, N, S>(&self, base: &P, new_names: N) -> Arc<ShapeDescriptor>
    where
        P: Prototype + ?Sized,
        N: IntoIterator<Item = S>,
        S: Into<PropertyName>,
    {
        let base_set = PropertySet::new(base.properties());
        self.extend_set(&base_set, &PropertySet::new(new_names))
    }

    /// Cached shape for exactly `names`, without building one.
    pub fn lookup<I, S>(&self, names: I) -> Option<Arc<ShapeDescriptor>>
    where
        I: IntoIterator<Item = S>,
        S: Into<PropertyName>,
    {
        let set = PropertySet::new(names);
        if set.is_empty() {
            return Some(Arc::clone(&self.root));
        }
        self.cache
            .get(&ShapeKey::of(&set))
            .filter(|shape| shape.full_properties() == &set)
    }

    /// Key the generator would use for `names`.
    pub fn key_for<I, S>(&self, names: I) -> ShapeKey
    where
        I: IntoIterator<Item = S>,
        S: Into<PropertyName>,
    {
        ShapeKey::from_names(names)
    }

    pub(crate) fn generate_set(&self, set: &PropertySet) -> Arc<ShapeDescriptor> {
        if set.is_empty() {
            return Arc::clone(&self.root);
        }
        self.extend_set(&PropertySet::empty(), set)
    }

    pub(crate) fn extend_set(&self, base: &PropertySet, added: &PropertySet) -> Arc<ShapeDescriptor> {
        let combined = base.union(added);
        if combined.len() == base.len() {
            // Nothing new: the base shape itself.
            return self.generate_set(base);
        }

        let key = ShapeKey::of(&combined);
        if let Some(hit) = self.cache.get(&key) {
            if !self.config.verify_on_hit || hit.full_properties() == &combined {
                trace!(%key, "shape cache hit");
                return hit;
            }
            warn!(
                %key,
                cached = ?hit.full_properties(),
                requested = ?combined,
                "shape key collision, building uncached shape"
            );
            self.cache.stats().record_collision();
            return self.build(base, &combined, key);
        }

        let shape = self.build(base, &combined, key);
        self.cache.publish(shape)
    }

    fn build(&self, base: &PropertySet, combined: &PropertySet, key: ShapeKey) -> Arc<ShapeDescriptor> {
        let structural_base = self.generate_set(base);
        let own = combined.difference(base);
        self.cache.stats().record_build();
        debug!(
            %key,
            own = own.len(),
            inherited = base.len(),
            depth = structural_base.depth() + 1,
            "built shape"
        );
        ShapeDescriptor::layered(structural_base, own, key)
    }

    /// Sweep dead cache entries. Returns how many were removed.
    pub fn purge(&self) -> usize {
        self.cache.purge()
    }

    /// Number of cached shapes that are still alive.
    pub fn cached_shapes(&self) -> usize {
        self.cache.live_len()
    }

    /// Get the underlying cache.
    #[inline]
    pub fn cache(&self) -> &ShapeCache {
        &self.cache
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.cache.stats().snapshot()
    }
}

impl Default for ShapeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
