//! Prototype-based object shapes.
//!
//! A *shape* fixes which named slots an object carries. Shapes are memoized by
//! their full property set: every request for `{a, b, c}`, in any order and
//! through any layering, resolves to one key and, while a descriptor is
//! alive, to one shared [`ShapeDescriptor`].
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ ShapeGenerator                                │
//! │   generate / generate_extended / derive       │
//! │   construct* shortcuts                        │
//! ├───────────────────────┬───────────────────────┤
//! │ ShapeCache            │ root ShapeDescriptor  │
//! │   Key -> Weak<Shape>  │   (held strongly)     │
//! └───────────┬───────────┴───────────────────────┘
//!             │ Arc<ShapeDescriptor>
//!             ▼
//!        Instance<V>  slots in sorted property order
//! ```
//!
//! # Example
//!
//! ```
//! use protoshape_runtime::ShapeGenerator;
//!
//! let generator = ShapeGenerator::new();
//! let base = generator.construct1("test", "prototypeValue").unwrap();
//! let child = generator
//!     .construct_extending(&base, [("test2", "two"), ("test3", "three")])
//!     .unwrap();
//!
//! assert_eq!(child.get("test"), Some(&"prototypeValue"));
//! assert_eq!(child.shape().own_properties().len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod object;
pub mod stats;

pub use config::{ConfigError, GeneratorConfig};
pub use error::{ShapeError, ShapeResult};
pub use object::cache::ShapeCache;
pub use object::generator::ShapeGenerator;
pub use object::instance::{INLINE_SLOTS, Instance};
pub use object::shape::{Ancestors, ShapeDescriptor};
pub use object::{Prototype, RootPrototype};
pub use stats::{CacheStats, CacheStatsSnapshot};

pub use protoshape_core::{PropertyName, PropertySet, ShapeKey};
