//! Shape keys: order-independent identity tokens for property sets.
//!
//! A key is the SHA-256 digest of a canonical byte encoding of a
//! [`PropertySet`]. The encoding is
//!
//! ```text
//! [3:foo,4:quux,3:zaj]
//! ```
//!
//! i.e. each sorted name prefixed with its UTF-8 byte length, comma-separated
//! and bracketed. The length prefix keeps the encoding injective even when a
//! name itself contains `,` or `]`.
//!
//! Keys are pure functions of the set: no salt, no process-local state.

use crate::name::{PropertyName, PropertySet};
use sha2::{Digest, Sha256};
use std::fmt;

/// Digest width in bytes.
pub const KEY_LEN: usize = 32;

/// Identity of a shape, derived only from its full property set.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeKey([u8; KEY_LEN]);

impl ShapeKey {
    /// Compute the key of an already normalized set.
    pub fn of(set: &PropertySet) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(encode(set));
        Self(hasher.finalize().into())
    }

    /// Normalize `names` and compute their key.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PropertyName>,
    {
        Self::of(&PropertySet::new(names))
    }

    /// Raw digest bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Full uppercase hexadecimal rendering.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02X}")).collect()
    }
}

/// Canonical byte encoding of a property set.
fn encode(set: &PropertySet) -> Vec<u8> {
    let payload: usize = set.iter().map(|name| name.len() + 8).sum();
    let mut out = Vec::with_capacity(payload + 2);
    out.push(b'[');
    for (i, name) in set.iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        out.extend_from_slice(name.len().to_string().as_bytes());
        out.push(b':');
        out.extend_from_slice(name.as_bytes());
    }
    out.push(b']');
    out
}

impl fmt::Display for ShapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ShapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapeKey(")?;
        for byte in &self.0[..6] {
            write!(f, "{byte:02X}")?;
        }
        write!(f, ")")
    }
}
