//! Property names and canonical property sets.
//!
//! A [`PropertySet`] is the normalized form every shape is built from: the
//! names are deduplicated and sorted byte-wise, so two collections holding the
//! same names always produce the same set regardless of input order.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

// =============================================================================
// Property Name
// =============================================================================

/// Immutable identifier of a single slot.
///
/// Cloning is a reference count bump. Ordering is ordinal (byte-wise) string
/// ordering, never locale aware.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PropertyName(Arc<str>);

impl PropertyName {
    /// Create a property name from anything string-like.
    #[inline]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for PropertyName {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PropertyName {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PropertyName {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyName {
    #[inline]
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for PropertyName {
    #[inline]
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<Arc<str>> for PropertyName {
    #[inline]
    fn from(name: Arc<str>) -> Self {
        Self(name)
    }
}

impl From<&PropertyName> for PropertyName {
    #[inline]
    fn from(name: &PropertyName) -> Self {
        name.clone()
    }
}

impl PartialEq<str> for PropertyName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for PropertyName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

// =============================================================================
// Property Set
// =============================================================================

/// A sorted, deduplicated collection of property names.
///
/// This is the canonical form used for shape identity and for slot layout:
/// the position of a name inside the set is its slot index.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertySet {
    names: Box<[PropertyName]>,
}

impl PropertySet {
    /// The empty set.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize an arbitrary collection of names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PropertyName>,
    {
        let mut names: Vec<PropertyName> = names.into_iter().map(Into::into).collect();
        names.sort_unstable();
        names.dedup();
        Self {
            names: names.into_boxed_slice(),
        }
    }

    /// Wrap names that are already sorted and unique.
    fn from_sorted(names: Vec<PropertyName>) -> Self {
        debug_assert!(names.windows(2).all(|w| w[0] < w[1]));
        Self {
            names: names.into_boxed_slice(),
        }
    }

    /// Number of names in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the set has no names.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The names in sorted order.
    #[inline]
    pub fn as_slice(&self) -> &[PropertyName] {
        &self.names
    }

    /// Iterate over the names in sorted order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, PropertyName> {
        self.names.iter()
    }

    /// Position of `name` in the set, which doubles as its slot index.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
    }

    /// Check if the set holds `name`.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Sorted union of both sets.
    pub fn union(&self, other: &PropertySet) -> PropertySet {
        let mut merged = Vec::with_capacity(self.len() + other.len());
        merged.extend(self.names.iter().cloned());
        merged.extend(other.names.iter().cloned());
        merged.sort_unstable();
        merged.dedup();
        Self::from_sorted(merged)
    }

    /// Names in `self` that are not in `other`, sorted.
    pub fn difference(&self, other: &PropertySet) -> PropertySet {
        let remaining = self
            .names
            .iter()
            .filter(|name| !other.contains(name))
            .cloned()
            .collect();
        Self::from_sorted(remaining)
    }

    /// Check if every name of `self` is also in `other`.
    pub fn is_subset(&self, other: &PropertySet) -> bool {
        self.len() <= other.len() && self.names.iter().all(|name| other.contains(name))
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = &'a PropertyName;
    type IntoIter = std::slice::Iter<'a, PropertyName>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

impl<S: Into<PropertyName>> FromIterator<S> for PropertySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names.iter()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> PropertySet {
        PropertySet::new(names.iter().copied())
    }

    // -------------------------------------------------------------------------
    // PropertyName Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_name_conversions() {
        let a = PropertyName::from("foo");
        let b = PropertyName::from(String::from("foo"));
        let c = PropertyName::new(Arc::<str>::from("foo"));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a, "foo");
        assert_eq!(a.as_str(), "foo");
        assert_eq!(a.to_string(), "foo");
    }

    #[test]
    fn test_name_ordering_is_ordinal() {
        // Uppercase sorts before lowercase in byte order.
        let mut names = vec![
            PropertyName::from("b"),
            PropertyName::from("B"),
            PropertyName::from("a"),
        ];
        names.sort();
        let ordered: Vec<&str> = names.iter().map(PropertyName::as_str).collect();
        assert_eq!(ordered, ["B", "a", "b"]);
    }

    // -------------------------------------------------------------------------
    // PropertySet Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_set_sorts_and_dedups() {
        let s = set(&["zaj", "foo", "quux", "foo"]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.as_slice(), ["foo", "quux", "zaj"].map(PropertyName::from));
    }

    #[test]
    fn test_set_order_independent() {
        assert_eq!(set(&["foo", "quux", "zaj"]), set(&["zaj", "foo", "quux"]));
    }

    #[test]
    fn test_empty_set() {
        let s = PropertySet::empty();
        assert!(s.is_empty());
        assert_eq!(s, set(&[]));
        assert_eq!(s.index_of("anything"), None);
    }

    #[test]
    fn test_index_of() {
        let s = set(&["c", "a", "b"]);
        assert_eq!(s.index_of("a"), Some(0));
        assert_eq!(s.index_of("b"), Some(1));
        assert_eq!(s.index_of("c"), Some(2));
        assert_eq!(s.index_of("d"), None);
        assert!(s.contains("b"));
    }

    #[test]
    fn test_union() {
        let a = set(&["test"]);
        let b = set(&["test3", "test2", "test"]);
        assert_eq!(a.union(&b), set(&["test", "test2", "test3"]));
        assert_eq!(a.union(&PropertySet::empty()), a);
        assert_eq!(set(&["x", "z"]).union(&set(&["y"])), set(&["x", "y", "z"]));
    }

    #[test]
    fn test_difference() {
        let full = set(&["test", "test2", "test3"]);
        let base = set(&["test"]);
        assert_eq!(full.difference(&base), set(&["test2", "test3"]));
        assert!(base.difference(&full).is_empty());
    }

    #[test]
    fn test_is_subset() {
        let full = set(&["a", "b", "c"]);
        assert!(set(&["a", "c"]).is_subset(&full));
        assert!(PropertySet::empty().is_subset(&full));
        assert!(!set(&["a", "d"]).is_subset(&full));
        assert!(!full.is_subset(&set(&["a"])));
    }

    #[test]
    fn test_unicode_names() {
        let s = set(&["名前", "привет", "🚀", "a"]);
        assert_eq!(s.index_of("a"), Some(0));
        assert!(s.contains("🚀"));
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", set(&["b", "a"])), r#"["a", "b"]"#);
    }
}
