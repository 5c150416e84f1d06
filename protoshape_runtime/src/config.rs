//! Shape generator configuration.
//!
//! Defaults suit a typical embedding; presets cover memory-tight and
//! allocation-heavy workloads.

use thiserror::Error;

/// Upper bound accepted for [`GeneratorConfig::initial_capacity`].
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;

/// Configuration for a [`ShapeGenerator`](crate::ShapeGenerator).
///
/// # Example
///
/// ```
/// use protoshape_runtime::{GeneratorConfig, ShapeGenerator};
///
/// let config = GeneratorConfig {
///     purge_threshold: 16,
///     ..Default::default()
/// };
/// let generator = ShapeGenerator::with_config(config).unwrap();
/// assert!(generator.cached_shapes() == 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Number of cache entries to allocate up front.
    ///
    /// Default: 64
    pub initial_capacity: usize,

    /// Dead cache entries tolerated before a sweep removes them.
    ///
    /// Entries die when the last descriptor reference outside the cache is
    /// dropped. They are harmless but occupy a bucket until swept.
    ///
    /// Default: 256
    pub purge_threshold: usize,

    /// Compare the full property set of every cache hit with the request.
    ///
    /// Guards against digest collisions at the cost of one slice comparison
    /// per hit.
    ///
    /// Default: true
    pub verify_on_hit: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            purge_threshold: 256,
            verify_on_hit: true,
        }
    }
}

impl GeneratorConfig {
    /// Sweep dead entries as soon as one is seen.
    pub fn compact() -> Self {
        Self {
            initial_capacity: 16,
            purge_threshold: 1,
            ..Default::default()
        }
    }

    /// Larger cache, lazier sweeping.
    pub fn throughput() -> Self {
        Self {
            initial_capacity: 4096,
            purge_threshold: 8192,
            ..Default::default()
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(ConfigError::CapacityTooLarge(self.initial_capacity));
        }
        if self.purge_threshold == 0 {
            return Err(ConfigError::ZeroPurgeThreshold);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Initial capacity above [`MAX_INITIAL_CAPACITY`].
    #[error("initial capacity {0} exceeds the maximum of {max}", max = MAX_INITIAL_CAPACITY)]
    CapacityTooLarge(usize),
    /// Purge threshold must be at least 1.
    #[error("purge threshold must be at least 1")]
    ZeroPurgeThreshold,
}
