//! Errors raised by instance construction and slot access.

use protoshape_core::{PropertyName, ShapeKey};
use thiserror::Error;

/// Errors from constructing or accessing shaped instances.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The supplied instance does not have the structural relationship the
    /// constructor requires.
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: ShapeKey, found: ShapeKey },

    /// A values list does not match the shape's slot count.
    #[error("expected {expected} values, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// The same key appeared twice in one key/value batch.
    #[error("property '{name}' supplied more than once")]
    DuplicateProperty { name: PropertyName },

    /// By-name access to a slot the shape does not have.
    #[error("shape has no property '{name}'")]
    UnknownProperty { name: PropertyName },
}

/// Result type for shape operations.
pub type ShapeResult<T> = Result<T, ShapeError>;
