//! Shaped object model.
//!
//! Everything that carries properties implements [`Prototype`], the one
//! capability the generator needs from a base: "what are my full property
//! names". [`RootPrototype`] is the property-less root every hierarchy starts
//! from.

pub mod cache;
pub mod construct;
pub mod generator;
pub mod instance;
pub mod shape;

use protoshape_core::PropertyName;

/// An object with a fixed, sorted list of property names.
pub trait Prototype {
    /// The full property names (inherited and own), sorted byte-wise.
    fn properties(&self) -> &[PropertyName];
}

/// The base prototype. It has no properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootPrototype;

impl Prototype for RootPrototype {
    #[inline]
    fn properties(&self) -> &[PropertyName] {
        &[]
    }
}
