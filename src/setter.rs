//! Standalone fast setters.
//!
//! A [`FastSetter`] writes one property of its declaring type directly, with
//! no catalog involved. All checks that depend only on metadata happen in
//! [`make_setter`], so a setter that was built can only fail on the instance
//! or the value it is handed.

use crate::catalog::descriptor::write_leaf;
use crate::error::{Error, Result};
use crate::reflect::{PropertyInfo, Reflect, TypeHandle, ValueCodec, Visibility};
use crate::value::PropertyValue;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct FastSetter {
    property: Arc<PropertyInfo>,
    codec: ValueCodec,
}

impl FastSetter {
    pub fn property(&self) -> &Arc<PropertyInfo> {
        &self.property
    }

    /// Store `value` into the property on `instance`.
    ///
    /// The instance is borrowed mutably, so the write is visible through the
    /// caller's binding whatever kind of type declares the property.
    pub fn set(&self, instance: &mut dyn Any, value: PropertyValue) -> Result<()> {
        let slot = self
            .property
            .project_mut(instance)
            .ok_or(Error::TypeMismatch {
                expected: self.property.declaring_type(),
            })?;
        write_leaf(self.codec, &self.property, self.property.name(), slot, value)
    }
}

impl fmt::Debug for FastSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastSetter")
            .field("declaring_type", &self.property.declaring_type())
            .field("property", &self.property.name())
            .field("kind", &self.codec.kind())
            .finish()
    }
}

/// Build a setter for `property`.
///
/// Fails when the property has no accessible setter (read-only or private),
/// or when its type is not a primitive leaf and so cannot be produced from a
/// [`PropertyValue`].
pub fn make_setter(property: &Arc<PropertyInfo>) -> Result<FastSetter> {
    if !property.has_setter() || property.visibility() != Visibility::Public {
        return Err(Error::MissingSetter {
            declaring_type: property.declaring_type(),
            property: property.name().to_string(),
        });
    }
    let codec = property
        .property_type()
        .codec()
        .ok_or_else(|| Error::UnsupportedSetter {
            declaring_type: property.declaring_type(),
            property: property.name().to_string(),
            property_type: property.property_type_name(),
        })?;
    Ok(FastSetter {
        property: Arc::clone(property),
        codec,
    })
}

/// Build a setter for the property of `ty` named `name`.
///
/// Only direct properties are considered; nested leaves are written through
/// [`AccessorDescriptor::set_value`](crate::AccessorDescriptor::set_value).
pub fn make_setter_for(ty: TypeHandle, name: &str) -> Result<FastSetter> {
    let shape = ty.shape().unwrapped();
    let property = shape.property(name).ok_or_else(|| Error::UnknownAccessor {
        type_name: shape.name(),
        name: name.to_string(),
    })?;
    make_setter(property)
}

pub fn make_setter_of<T: Reflect>(name: &str) -> Result<FastSetter> {
    make_setter_for(TypeHandle::of::<T>(), name)
}
