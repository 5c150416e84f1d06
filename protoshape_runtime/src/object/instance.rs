//! Shaped instances.
//!
//! An instance pairs one shape (fixed at construction) with a slot array
//! holding one value per name of the shape's full property set, in sorted
//! order. An unset slot is `None`.
//!
//! # Construction strategies
//!
//! | Constructor | Source | Slots |
//! |---|---|---|
//! | [`Instance::new`] | nothing | all unset |
//! | [`Instance::from_base`] | instance of the shape's base | inherited copied, own unset |
//! | [`Instance::copy_from`] | instance of the same shape | all copied |
//! | [`Instance::from_values`] | values in slot order | all assigned |
//! | [`Instance::widen`] | instance of any sub-shape | matching names copied |
//!
//! # Storage
//!
//! Small shapes keep their slots inline; larger ones spill to the heap.

use super::Prototype;
use super::shape::ShapeDescriptor;
use crate::error::{ShapeError, ShapeResult};
use protoshape_core::{PropertyName, PropertySet, ShapeKey};
use smallvec::SmallVec;
use std::sync::Arc;

/// Number of slots stored inline before spilling to the heap.
pub const INLINE_SLOTS: usize = 8;

type SlotStorage<V> = SmallVec<[Option<V>; INLINE_SLOTS]>;

// =============================================================================
// Instance
// =============================================================================

/// An object of a given shape.
///
/// The instance owns its slots exclusively and shares its shape read-only.
/// Cloning copies the slots; the clone has the same shape.
#[derive(Debug, Clone)]
pub struct Instance<V> {
    /// Shape of this instance, never reassigned.
    shape: Arc<ShapeDescriptor>,

    /// One entry per full property, in slot order.
    slots: SlotStorage<V>,
}

impl<V> Instance<V> {
    /// Default construction: every slot unset.
    pub fn new(shape: Arc<ShapeDescriptor>) -> Self {
        let slots = std::iter::repeat_with(|| None)
            .take(shape.slot_count())
            .collect();
        Self { shape, slots }
    }

    /// Positional construction: `values[i]` goes to the slot of the `i`th
    /// name of the shape's full property set.
    ///
    /// The slot array is flat regardless of how the shape was layered, so
    /// positional assignment is well defined for every shape.
    pub fn from_values<I>(shape: Arc<ShapeDescriptor>, values: I) -> ShapeResult<Self>
    where
        I: IntoIterator<Item = V>,
    {
        let slots: SlotStorage<V> = values.into_iter().map(Some).collect();
        if slots.len() != shape.slot_count() {
            return Err(ShapeError::ArityMismatch {
                expected: shape.slot_count(),
                found: slots.len(),
            });
        }
        Ok(Self { shape, slots })
    }

    /// Get the instance's shape.
    #[inline]
    pub fn shape(&self) -> &Arc<ShapeDescriptor> {
        &self.shape
    }

    /// Get the key of the instance's shape.
    #[inline]
    pub fn key(&self) -> ShapeKey {
        self.shape.key()
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the instance has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Value of `name`, if the shape has the slot and it is set.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.shape
            .slot_of(name)
            .and_then(|slot| self.slots[slot].as_ref())
    }

    /// Mutable access to the value of `name`, if set.
    #[inline]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        self.shape
            .slot_of(name)
            .and_then(|slot| self.slots[slot].as_mut())
    }

    /// Set the slot for `name`, returning the previous value.
    pub fn set(&mut self, name: &str, value: V) -> ShapeResult<Option<V>> {
        let slot = self.slot_index(name)?;
        Ok(self.slots[slot].replace(value))
    }

    /// Clear the slot for `name`, returning the previous value.
    pub fn unset(&mut self, name: &str) -> ShapeResult<Option<V>> {
        let slot = self.slot_index(name)?;
        Ok(self.slots[slot].take())
    }

    /// Check if the slot for `name` exists and holds a value.
    #[inline]
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Value at a slot index obtained from [`ShapeDescriptor::slot_of`].
    ///
    /// Out-of-range indices and unset slots both yield `None`.
    #[inline]
    pub fn slot(&self, index: usize) -> Option<&V> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Store into a slot index obtained from [`ShapeDescriptor::slot_of`].
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn set_slot(&mut self, index: usize, value: V) -> Option<V> {
        self.slots[index].replace(value)
    }

    /// Iterate over `(name, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyName, Option<&V>)> + '_ {
        self.shape
            .full_properties()
            .iter()
            .zip(self.slots.iter().map(Option::as_ref))
    }

    /// Consume the instance, yielding its slot values in slot order.
    pub fn into_values(self) -> impl Iterator<Item = Option<V>> {
        self.slots.into_iter()
    }

    fn slot_index(&self, name: &str) -> ShapeResult<usize> {
        self.shape
            .slot_of(name)
            .ok_or_else(|| ShapeError::UnknownProperty { name: name.into() })
    }
}

impl<V: Clone> Instance<V> {
    /// From-base construction: copy every inherited slot from `base`, leave
    /// the shape's own slots unset.
    ///
    /// `base` must have exactly the full property set of `shape`'s base.
    pub fn from_base(shape: Arc<ShapeDescriptor>, base: &Instance<V>) -> ShapeResult<Self> {
        if base.shape.full_properties().as_slice() != shape.base_properties() {
            return Err(ShapeError::ShapeMismatch {
                expected: expected_base_key(&shape),
                found: base.key(),
            });
        }

        let mut instance = Self::new(shape);
        for (from, &to) in instance.shape.base_slots().iter().enumerate() {
            instance.slots[to] = base.slots[from].clone();
        }
        Ok(instance)
    }

    /// Copy construction: `other` must have the same shape; every slot is
    /// copied verbatim.
    pub fn copy_from(shape: Arc<ShapeDescriptor>, other: &Instance<V>) -> ShapeResult<Self> {
        if !other.shape.same_shape(&shape) {
            return Err(ShapeError::ShapeMismatch {
                expected: shape.key(),
                found: other.key(),
            });
        }
        Ok(Self {
            shape,
            slots: other.slots.clone(),
        })
    }

    /// Copy every slot of `source` into a new instance of `shape` by name.
    ///
    /// Unlike [`Instance::from_base`] this accepts any instance whose full
    /// property set is a subset of `shape`'s, however `shape` was layered.
    /// Names `source` lacks stay unset.
    pub fn widen(shape: Arc<ShapeDescriptor>, source: &Instance<V>) -> ShapeResult<Self> {
        if !source.shape.full_properties().is_subset(shape.full_properties()) {
            return Err(ShapeError::ShapeMismatch {
                expected: shape.key(),
                found: source.key(),
            });
        }

        let mut instance = Self::new(shape);
        for (name, value) in source.shape.full_properties().iter().zip(&source.slots) {
            if let Some(slot) = instance.shape.slot_of(name) {
                instance.slots[slot] = value.clone();
            }
        }
        Ok(instance)
    }
}

fn expected_base_key(shape: &ShapeDescriptor) -> ShapeKey {
    match shape.base() {
        Some(base) => base.key(),
        None => ShapeKey::of(&PropertySet::empty()),
    }
}

impl<V> Prototype for Instance<V> {
    #[inline]
    fn properties(&self) -> &[PropertyName] {
        self.shape.full_properties().as_slice()
    }
}

impl<V: PartialEq> PartialEq for Instance<V> {
    fn eq(&self, other: &Self) -> bool {
        self.shape.same_shape(&other.shape) && self.slots == other.slots
    }
}

impl<V: Eq> Eq for Instance<V> {}

// =============================================================================
// Tests
// =============================================================================
