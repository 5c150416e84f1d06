//! Core vocabulary for the protoshape engine.
//!
//! This crate provides:
//! - `PropertyName`: cheap, immutable slot identifiers
//! - `PropertySet`: canonical (sorted, deduplicated) name sets
//! - `ShapeKey`: the order-independent digest used to memoize shapes

pub mod key;
pub mod name;

pub use key::{KEY_LEN, ShapeKey};
pub use name::{PropertyName, PropertySet};
