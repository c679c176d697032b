//! Cached, flattened property accessors.
//!
//! Types register their properties through [`reflect::Reflect`] (usually via
//! [`reflect_struct!`]). [`PropertyCatalog`] walks a registered type once,
//! recursing into nested composites, and memoizes one [`AccessorDescriptor`]
//! per primitive leaf under a dotted name such as `Address.City`. Descriptors
//! read and write through compiled projections, so per-access cost is a few
//! downcasts rather than a metadata walk.
//!
//! The free functions here use the process-wide catalog; construct a
//! [`PropertyCatalog`] directly for an isolated cache or non-default
//! [`CatalogConfig`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod flatten;
pub mod reflect;
pub mod setter;
pub mod value;

pub use catalog::{AccessorDescriptor, Accessors, PropertyCatalog};
pub use config::{CatalogConfig, CyclePolicy};
pub use error::{Error, Result};
pub use flatten::{PropertyChange, diff, snapshot, to_json};
pub use reflect::{PropertyInfo, Reflect, TypeHandle, TypeShape};
pub use setter::{FastSetter, make_setter, make_setter_for, make_setter_of};
pub use value::{Primitive, PrimitiveKind, PropertyValue, ValueError};

use std::any::Any;

/// Accessors for `ty` from the process-wide catalog.
pub fn get_accessors(ty: TypeHandle) -> Result<Accessors> {
    PropertyCatalog::global().accessors(ty)
}

/// Accessors for `T` from the process-wide catalog.
pub fn accessors_of<T: Reflect>() -> Result<Accessors> {
    PropertyCatalog::global().accessors_of::<T>()
}

/// Read one leaf; equivalent to [`AccessorDescriptor::get_value`].
pub fn get_value(descriptor: &AccessorDescriptor, instance: &dyn Any) -> Result<PropertyValue> {
    descriptor.get_value(instance)
}
