//! Construction shortcuts on [`ShapeGenerator`].
//!
//! Each shortcut resolves a shape and then runs one of the
//! [`Instance`] constructors:
//!
//! - `construct(keys, values)`: flat shape, positional construction
//! - `construct_extending(&base, pairs)`: derived shape, inherited slots
//!   copied from `base`, supplied slots filled
//! - `construct_from_base(&base, keys)`: derived shape, new slots unset
//! - `construct1..3`: fixed-arity forms of `construct`

use super::generator::ShapeGenerator;
use super::instance::Instance;
use super::shape::ShapeDescriptor;
use crate::error::{ShapeError, ShapeResult};
use protoshape_core::{PropertyName, PropertySet};
use std::sync::Arc;

impl ShapeGenerator {
    /// Build an instance with `keys[i]` set to `values[i]`.
    ///
    /// Keys and values are paired before the keys are sorted into slot
    /// order, so input order does not matter.
    pub fn construct<K, S, I, V>(&self, keys: K, values: I) -> ShapeResult<Instance<V>>
    where
        K: IntoIterator<Item = S>,
        S: Into<PropertyName>,
        I: IntoIterator<Item = V>,
    {
        let keys: Vec<PropertyName> = keys.into_iter().map(Into::into).collect();
        let values: Vec<V> = values.into_iter().collect();
        if keys.len() != values.len() {
            return Err(ShapeError::ArityMismatch {
                expected: keys.len(),
                found: values.len(),
            });
        }

        let mut pairs: Vec<(PropertyName, V)> = keys.into_iter().zip(values).collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        reject_duplicates(pairs.iter().map(|(name, _)| name))?;

        let shape = self.generate_set(&PropertySet::new(pairs.iter().map(|(name, _)| name)));
        Instance::from_values(shape, pairs.into_iter().map(|(_, value)| value))
    }

    /// Extend `base` with new `(key, value)` pairs.
    ///
    /// The result's shape is derived from `base`'s shape. Inherited slots are
    /// copied from `base`; each supplied pair is then stored, overriding the
    /// copied value when the key was already inherited.
    pub fn construct_extending<P, S, V>(&self, base: &Instance<V>, pairs: P) -> ShapeResult<Instance<V>>
    where
        P: IntoIterator<Item = (S, V)>,
        S: Into<PropertyName>,
        V: Clone,
    {
        let mut pairs: Vec<(PropertyName, V)> =
            pairs.into_iter().map(|(name, value)| (name.into(), value)).collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        reject_duplicates(pairs.iter().map(|(name, _)| name))?;

        let shape = self.derive(base, pairs.iter().map(|(name, _)| name));
        let mut instance = instantiate_from(shape, base)?;
        for (name, value) in pairs {
            instance.set(&name, value)?;
        }
        Ok(instance)
    }

    /// Extend `base` with new property names, leaving their slots unset.
    pub fn construct_from_base<K, S, V>(&self, base: &Instance<V>, keys: K) -> ShapeResult<Instance<V>>
    where
        K: IntoIterator<Item = S>,
        S: Into<PropertyName>,
        V: Clone,
    {
        let shape = self.derive(base, keys);
        instantiate_from(shape, base)
    }

    /// Single-property [`construct`](Self::construct).
    pub fn construct1<S, V>(&self, key0: S, value0: V) -> ShapeResult<Instance<V>>
    where
        S: Into<PropertyName>,
    {
        self.construct([key0], [value0])
    }

    /// Two-property [`construct`](Self::construct): keys first, then values.
    pub fn construct2<S, V>(&self, key0: S, key1: S, value0: V, value1: V) -> ShapeResult<Instance<V>>
    where
        S: Into<PropertyName>,
    {
        self.construct([key0, key1], [value0, value1])
    }

    /// Three-property [`construct`](Self::construct): keys first, then values.
    pub fn construct3<S, V>(
        &self,
        key0: S,
        key1: S,
        key2: S,
        value0: V,
        value1: V,
        value2: V,
    ) -> ShapeResult<Instance<V>>
    where
        S: Into<PropertyName>,
    {
        self.construct([key0, key1, key2], [value0, value1, value2])
    }
}

/// From-base construction when `shape` is layered directly on `base`'s
/// shape, by-name widening otherwise.
///
/// The cache is keyed by full property set only, so the shape found for an
/// extension may have been layered on a different base by an earlier caller.
fn instantiate_from<V: Clone>(shape: Arc<ShapeDescriptor>, base: &Instance<V>) -> ShapeResult<Instance<V>> {
    if shape.base_properties() == base.shape().full_properties().as_slice() {
        Instance::from_base(shape, base)
    } else {
        Instance::widen(shape, base)
    }
}

/// Fail on the first name repeated in an already sorted sequence.
fn reject_duplicates<'a>(sorted: impl Iterator<Item = &'a PropertyName>) -> ShapeResult<()> {
    let mut previous: Option<&PropertyName> = None;
    for name in sorted {
        if previous == Some(name) {
            return Err(ShapeError::DuplicateProperty { name: name.clone() });
        }
        previous = Some(name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Prototype;

    fn props<V>(instance: &Instance<V>) -> Vec<&str> {
        instance.properties().iter().map(PropertyName::as_str).collect()
    }

    // -------------------------------------------------------------------------
    // Flat Construction Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_construct_keys_values() {
        let generator = ShapeGenerator::new();
        let instance = generator
            .construct(["foo", "quux", "zaj"], ["blah", "yummy", "piff"])
            .unwrap();

        assert_eq!(props(&instance), ["foo", "quux", "zaj"]);
        assert_eq!(instance.get("foo"), Some(&"blah"));
        assert_eq!(instance.get("quux"), Some(&"yummy"));
        assert_eq!(instance.get("zaj"), Some(&"piff"));
    }

    #[test]
    fn test_construct_pairs_follow_their_keys() {
        let generator = ShapeGenerator::new();
        let instance = generator
            .construct(["zaj", "foo", "quux"], ["piff", "blah", "yummy"])
            .unwrap();

        assert_eq!(instance.get("foo"), Some(&"blah"));
        assert_eq!(instance.get("quux"), Some(&"yummy"));
        assert_eq!(instance.get("zaj"), Some(&"piff"));
    }

    #[test]
    fn test_construct_length_mismatch() {
        let generator = ShapeGenerator::new();
        assert_eq!(
            generator.construct(["a", "b"], [1]).unwrap_err(),
            ShapeError::ArityMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_construct_duplicate_key() {
        let generator = ShapeGenerator::new();
        assert_eq!(
            generator.construct(["a", "b", "a"], [1, 2, 3]).unwrap_err(),
            ShapeError::DuplicateProperty { name: "a".into() }
        );
    }

    #[test]
    fn test_construct_empty_is_root_instance() {
        let generator = ShapeGenerator::new();
        let instance = generator
            .construct(Vec::<&str>::new(), Vec::<u8>::new())
            .unwrap();
        assert!(instance.shape().is_root());
        assert!(instance.is_empty());
    }

    #[test]
    fn test_construct_arity_forms() {
        let generator = ShapeGenerator::new();

        let one = generator.construct1("foo", "blah").unwrap();
        assert_eq!(props(&one), ["foo"]);
        assert_eq!(one.get("foo"), Some(&"blah"));

        let two = generator.construct2("foo", "quux", "blah", "yummy").unwrap();
        assert_eq!(props(&two), ["foo", "quux"]);
        assert_eq!(two.get("quux"), Some(&"yummy"));

        let three = generator
            .construct3("foo", "quux", "zaj", "blah", "yummy", "piff")
            .unwrap();
        assert_eq!(props(&three), ["foo", "quux", "zaj"]);
        assert_eq!(three.get("zaj"), Some(&"piff"));
    }

    #[test]
    fn test_construct_twice_shares_shape_not_slots() {
        let generator = ShapeGenerator::new();
        let mut first = generator.construct1("key0", 1).unwrap();
        let second = generator.construct1("key0", 1).unwrap();

        assert_eq!(first.key(), second.key());
        assert!(Arc::ptr_eq(first.shape(), second.shape()));

        first.set("key0", 2).unwrap();
        assert_eq!(second.get("key0"), Some(&1));
    }

    // -------------------------------------------------------------------------
    // Extension Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_construct_extending() {
        let generator = ShapeGenerator::new();
        let base = generator.construct1("test", "prototypeValue").unwrap();
        let child = generator
            .construct_extending(&base, [("test2", "two"), ("test3", "three")])
            .unwrap();

        assert_eq!(props(&child), ["test", "test2", "test3"]);
        assert_eq!(child.get("test"), Some(&"prototypeValue"));
        assert_eq!(child.get("test2"), Some(&"two"));
        assert_eq!(child.get("test3"), Some(&"three"));
        assert!(Arc::ptr_eq(child.shape().base().unwrap(), base.shape()));
    }

    #[test]
    fn test_construct_extending_overrides_inherited() {
        let generator = ShapeGenerator::new();
        let base = generator.construct2("a", "b", 1, 2).unwrap();
        let child = generator
            .construct_extending(&base, [("b", 20), ("c", 30)])
            .unwrap();

        assert_eq!(child.get("a"), Some(&1));
        assert_eq!(child.get("b"), Some(&20));
        assert_eq!(child.get("c"), Some(&30));
        assert_eq!(base.get("b"), Some(&2));
    }

    #[test]
    fn test_construct_extending_with_only_inherited_keys() {
        let generator = ShapeGenerator::new();
        let base = generator.construct2("a", "b", 1, 2).unwrap();
        let same = generator.construct_extending(&base, [("a", 10)]).unwrap();

        assert!(Arc::ptr_eq(same.shape(), base.shape()));
        assert_eq!(same.get("a"), Some(&10));
        assert_eq!(same.get("b"), Some(&2));
    }

    #[test]
    fn test_construct_extending_duplicate_key() {
        let generator = ShapeGenerator::new();
        let base = generator.construct1("a", 1).unwrap();
        assert!(matches!(
            generator.construct_extending(&base, [("x", 1), ("x", 2)]),
            Err(ShapeError::DuplicateProperty { .. })
        ));
    }

    #[test]
    fn test_construct_extending_reuses_differently_layered_shape() {
        let generator = ShapeGenerator::new();
        // Cache {a,b,c} layered on {a}.
        let layered = generator.generate_extended(["a"], ["b", "c"]);

        let base = generator.construct2("a", "b", 1, 2).unwrap();
        let child = generator.construct_extending(&base, [("c", 3)]).unwrap();

        assert!(Arc::ptr_eq(child.shape(), &layered));
        assert_eq!(child.get("a"), Some(&1));
        assert_eq!(child.get("b"), Some(&2));
        assert_eq!(child.get("c"), Some(&3));
    }

    #[test]
    fn test_construct_from_base_leaves_new_slots_unset() {
        let generator = ShapeGenerator::new();
        let base = generator.construct1("test", "prototypeValue").unwrap();
        let child = generator.construct_from_base(&base, ["test2", "test3"]).unwrap();

        assert_eq!(child.get("test"), Some(&"prototypeValue"));
        assert!(!child.is_set("test2"));
        assert!(!child.is_set("test3"));
    }

    #[test]
    fn test_construct_from_root_instance() {
        let generator = ShapeGenerator::new();
        let root: Instance<&str> = Instance::new(Arc::clone(generator.root()));
        let mut with_foo = generator.construct_from_base(&root, ["foo"]).unwrap();

        assert_eq!(props(&with_foo), ["foo"]);
        with_foo.set("foo", "blah").unwrap();
        assert_eq!(with_foo.get("foo"), Some(&"blah"));
    }

    #[test]
    fn test_reject_duplicates_helper() {
        let names: Vec<PropertyName> = ["a", "b", "b"].into_iter().map(Into::into).collect();
        assert!(reject_duplicates(names.iter()).is_err());
        assert!(reject_duplicates(names[..2].iter()).is_ok());
    }
}
