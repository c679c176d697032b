//! Registration table standing in for runtime reflection.
//!
//! A type takes part in cataloguing by implementing [`Reflect`], which hands
//! back a [`TypeShape`]: its name, whether it is a primitive leaf, and for
//! composites the ordered list of [`PropertyInfo`] entries with compiled
//! projections. Most structs use the [`reflect_struct!`](crate::reflect_struct)
//! macro; the builder API covers everything the macro cannot express
//! (private, static, indexed, or write-only members).

pub mod builtin;
pub mod macros;
pub mod property;
pub mod shape;

pub use property::{MutProjector, PropertyBuilder, PropertyInfo, Projector, Visibility};
pub use shape::{ShapeBuilder, ShapeKind, TypeShape, ValueCodec, WrapperKind, WrapperShape};

use std::any::{Any, TypeId};
use std::fmt;

/// A type whose properties can be enumerated.
pub trait Reflect: Any + Send + Sync {
    fn shape() -> TypeShape;

    /// Leaf codec for primitive types. Composites keep the default.
    fn codec() -> Option<ValueCodec> {
        None
    }
}

/// Runtime identifier for a reflected type.
///
/// Cheap to copy and compare; the shape itself is only built when the catalog
/// misses its cache.
#[derive(Clone, Copy)]
pub struct TypeHandle {
    id: TypeId,
    name: &'static str,
    shape: fn() -> TypeShape,
}

impl TypeHandle {
    pub fn of<T: Reflect>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            shape: T::shape,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> TypeShape {
        (self.shape)()
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeHandle {}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeHandle").field(&self.name).finish()
    }
}
