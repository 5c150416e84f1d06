//! Shape descriptors.
//!
//! A shape describes which named slots an instance carries and how the shape
//! was layered on top of its base:
//!
//! ```text
//!        Root  []
//!          |
//!       ["test"]                  own = ["test"]
//!          |
//!   ["test","test2","test3"]      own = ["test2","test3"]
//! ```
//!
//! Slots are laid out in the sorted order of the *full* property set, so a
//! name's slot index is its position in [`ShapeDescriptor::full_properties`].
//! Because that order interleaves inherited and own names, each descriptor
//! precomputes where every base slot lands in its own layout; from-base
//! construction copies through that table instead of searching by name.
//!
//! Descriptors are immutable once built and shared through `Arc`.

use super::Prototype;
use protoshape_core::{PropertyName, PropertySet, ShapeKey};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Shape Descriptor
// =============================================================================

/// Immutable description of a shape's slot layout and its place in the
/// shape hierarchy.
pub struct ShapeDescriptor {
    /// Digest of `full`.
    key: ShapeKey,

    /// Structural base (None for the root shape).
    base: Option<Arc<ShapeDescriptor>>,

    /// Names introduced at this layer.
    own: PropertySet,

    /// Sorted union of the base's full names and `own`.
    full: PropertySet,

    /// For base slot `i`, the index of the same name in this layout.
    base_slots: Box<[usize]>,

    /// Number of layers above the root.
    depth: u32,
}

impl ShapeDescriptor {
    /// Create the root shape: no base, no properties.
    pub(crate) fn root() -> Arc<Self> {
        let full = PropertySet::empty();
        Arc::new(Self {
            key: ShapeKey::of(&full),
            base: None,
            own: PropertySet::empty(),
            full,
            base_slots: Box::default(),
            depth: 0,
        })
    }

    /// Layer `own` on top of `base`.
    ///
    /// `own` must be disjoint from the base's full set and `key` must be the
    /// key of the combined set.
    pub(crate) fn layered(base: Arc<ShapeDescriptor>, own: PropertySet, key: ShapeKey) -> Arc<Self> {
        debug_assert!(
            own.iter().all(|name| !base.full.contains(name)),
            "own properties overlap the base"
        );

        let full = base.full.union(&own);
        debug_assert_eq!(key, ShapeKey::of(&full), "key does not match property set");

        // Both sets are sorted and base ⊆ full, so scanning the union in
        // order yields base slots in base order.
        let base_slots = full
            .iter()
            .enumerate()
            .filter(|(_, name)| base.full.contains(name))
            .map(|(slot, _)| slot)
            .collect();

        let depth = base.depth + 1;
        Arc::new(Self {
            key,
            base: Some(base),
            own,
            full,
            base_slots,
            depth,
        })
    }

    /// Layer `own` on `base` under an arbitrary key, skipping the key check.
    /// Lets tests stand in for a digest collision.
    #[cfg(test)]
    pub(crate) fn forged(base: Arc<ShapeDescriptor>, own: PropertySet, key: ShapeKey) -> Arc<Self> {
        let full = base.full.union(&own);
        let depth = base.depth + 1;
        Arc::new(Self {
            key,
            base: Some(base),
            own,
            full,
            base_slots: Box::default(),
            depth,
        })
    }

    /// Get the shape key.
    #[inline]
    pub fn key(&self) -> ShapeKey {
        self.key
    }

    /// Get the structural base shape.
    #[inline]
    pub fn base(&self) -> Option<&Arc<ShapeDescriptor>> {
        self.base.as_ref()
    }

    /// Names introduced at this layer.
    #[inline]
    pub fn own_properties(&self) -> &PropertySet {
        &self.own
    }

    /// All names, inherited and own, in slot order.
    #[inline]
    pub fn full_properties(&self) -> &PropertySet {
        &self.full
    }

    /// Full names of the base shape (empty for the root).
    #[inline]
    pub fn base_properties(&self) -> &[PropertyName] {
        self.base.as_deref().map_or(&[], |base| base.full.as_slice())
    }

    /// Number of slots an instance of this shape carries.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.full.len()
    }

    /// Slot index of `name`, if the shape has it.
    #[inline]
    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.full.index_of(name)
    }

    /// Check if this is the root shape.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.base.is_none()
    }

    /// Number of layers between this shape and the root.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Where each base slot lands in this layout.
    #[inline]
    pub(crate) fn base_slots(&self) -> &[usize] {
        &self.base_slots
    }

    /// Walk the base chain, nearest base first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: self.base.as_deref(),
        }
    }

    /// Check if `other` is one of this shape's ancestors.
    pub fn is_derived_from(&self, other: &ShapeDescriptor) -> bool {
        self.ancestors().any(|ancestor| ancestor.same_shape(other))
    }

    /// Check if both descriptors describe the same shape.
    ///
    /// Identity is the fast path; otherwise the key and full property set
    /// must both agree.
    #[inline]
    pub fn same_shape(&self, other: &ShapeDescriptor) -> bool {
        std::ptr::eq(self, other) || (self.key == other.key && self.full == other.full)
    }
}

impl Prototype for ShapeDescriptor {
    #[inline]
    fn properties(&self) -> &[PropertyName] {
        self.full.as_slice()
    }
}

impl fmt::Debug for ShapeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeDescriptor")
            .field("key", &self.key)
            .field("own", &self.own)
            .field("full", &self.full)
            .field("depth", &self.depth)
            .finish()
    }
}

/// Iterator over a shape's bases, see [`ShapeDescriptor::ancestors`].
pub struct Ancestors<'a> {
    next: Option<&'a ShapeDescriptor>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ShapeDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.base.as_deref();
        Some(current)
    }
}

// =============================================================================
// Tests
// =============================================================================
