//! Type metadata: what a registered type looks like to the catalog.

use crate::error::{Error, Result};
use crate::reflect::Reflect;
use crate::reflect::property::{PropertyBuilder, PropertyInfo};
use crate::value::{Primitive, PrimitiveKind, PropertyValue, ValueError};
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Metadata for one registered type.
#[derive(Clone)]
pub struct TypeShape {
    name: &'static str,
    id: TypeId,
    kind: ShapeKind,
    codec: Option<ValueCodec>,
}

#[derive(Clone)]
pub enum ShapeKind {
    /// A value with no enumerable members (numbers, strings, opaque types).
    Scalar,
    /// `Option<T>` or `Box<T>`: transparent to enumeration.
    Wrapper(WrapperShape),
    /// A type with properties, in declaration order.
    Composite(Vec<Arc<PropertyInfo>>),
}

impl TypeShape {
    /// Shape for a type without members. Leaf-ness comes from `T::codec()`.
    pub fn scalar<T: Reflect>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
            kind: ShapeKind::Scalar,
            codec: T::codec(),
        }
    }

    pub fn wrapper<T: Reflect>(wrapper: WrapperShape) -> Self {
        Self {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
            kind: ShapeKind::Wrapper(wrapper),
            codec: T::codec(),
        }
    }

    /// Start describing a composite type. `name` is the display name used in
    /// errors and as the declaring type of its properties.
    pub fn composite<T: Reflect>(name: &'static str) -> ShapeBuilder<T> {
        ShapeBuilder {
            name,
            properties: Vec::new(),
            _owner: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Present when the type is a primitive leaf (possibly behind wrappers).
    pub fn codec(&self) -> Option<ValueCodec> {
        self.codec
    }

    pub fn is_primitive(&self) -> bool {
        self.codec.is_some()
    }

    /// Composite properties, or an empty slice for scalars and wrappers.
    pub fn properties(&self) -> &[Arc<PropertyInfo>] {
        match &self.kind {
            ShapeKind::Composite(properties) => properties,
            _ => &[],
        }
    }

    pub fn property(&self, name: &str) -> Option<&Arc<PropertyInfo>> {
        self.properties().iter().find(|property| property.name() == name)
    }

    /// Peel every wrapper layer and return the innermost shape.
    pub fn unwrapped(self) -> TypeShape {
        let mut current = self;
        while let ShapeKind::Wrapper(wrapper) = &current.kind {
            current = wrapper.inner();
        }
        current
    }
}

impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            ShapeKind::Scalar => "scalar".to_string(),
            ShapeKind::Wrapper(wrapper) => format!("{:?}", wrapper.kind()),
            ShapeKind::Composite(properties) => format!("composite({})", properties.len()),
        };
        f.debug_struct("TypeShape")
            .field("name", &self.name)
            .field("kind", &kind)
            .field("primitive", &self.codec.map(|codec| codec.kind()))
            .finish()
    }
}

/// Accumulates properties for [`TypeShape::composite`].
pub struct ShapeBuilder<T> {
    name: &'static str,
    properties: Vec<Arc<PropertyInfo>>,
    _owner: PhantomData<fn(&T)>,
}

impl<T: Reflect> ShapeBuilder<T> {
    /// Register a public, readable, writable field.
    pub fn field<F: Reflect>(
        self,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.property(PropertyBuilder::field(name, get, get_mut))
    }

    pub fn property(mut self, property: PropertyBuilder<T>) -> Self {
        self.properties.push(Arc::new(property.build(self.name)));
        self
    }

    pub fn build(self) -> TypeShape {
        TypeShape {
            name: self.name,
            id: TypeId::of::<T>(),
            kind: ShapeKind::Composite(self.properties),
            codec: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WrapperKind {
    Nullable,
    Boxed,
}

/// Navigation through a wrapper layer.
///
/// `unwrap` yields `Ok(None)` for an empty nullable and `TypeMismatch` when the
/// slot is not the wrapper type.
#[derive(Clone, Copy)]
pub struct WrapperShape {
    kind: WrapperKind,
    inner: fn() -> TypeShape,
    unwrap: fn(&dyn Any) -> Result<Option<&dyn Any>>,
    unwrap_mut: fn(&mut dyn Any) -> Result<Option<&mut dyn Any>>,
}

impl WrapperShape {
    pub fn nullable<T: Reflect>() -> Self {
        Self {
            kind: WrapperKind::Nullable,
            inner: T::shape,
            unwrap: unwrap_option::<T>,
            unwrap_mut: unwrap_option_mut::<T>,
        }
    }

    pub fn boxed<T: Reflect>() -> Self {
        Self {
            kind: WrapperKind::Boxed,
            inner: T::shape,
            unwrap: unwrap_box::<T>,
            unwrap_mut: unwrap_box_mut::<T>,
        }
    }

    pub fn kind(&self) -> WrapperKind {
        self.kind
    }

    pub fn inner(&self) -> TypeShape {
        (self.inner)()
    }

    pub(crate) fn unwrap<'a>(&self, slot: &'a dyn Any) -> Result<Option<&'a dyn Any>> {
        (self.unwrap)(slot)
    }

    pub(crate) fn unwrap_mut<'a>(&self, slot: &'a mut dyn Any) -> Result<Option<&'a mut dyn Any>> {
        (self.unwrap_mut)(slot)
    }
}

fn unwrap_option<T: Reflect>(slot: &dyn Any) -> Result<Option<&dyn Any>> {
    let slot = slot
        .downcast_ref::<Option<T>>()
        .ok_or_else(Error::type_mismatch::<Option<T>>)?;
    Ok(slot.as_ref().map(|inner| inner as &dyn Any))
}

fn unwrap_option_mut<T: Reflect>(slot: &mut dyn Any) -> Result<Option<&mut dyn Any>> {
    let slot = slot
        .downcast_mut::<Option<T>>()
        .ok_or_else(Error::type_mismatch::<Option<T>>)?;
    Ok(slot.as_mut().map(|inner| inner as &mut dyn Any))
}

fn unwrap_box<T: Reflect>(slot: &dyn Any) -> Result<Option<&dyn Any>> {
    let slot = slot
        .downcast_ref::<Box<T>>()
        .ok_or_else(Error::type_mismatch::<Box<T>>)?;
    Ok(Some(&**slot as &dyn Any))
}

fn unwrap_box_mut<T: Reflect>(slot: &mut dyn Any) -> Result<Option<&mut dyn Any>> {
    let slot = slot
        .downcast_mut::<Box<T>>()
        .ok_or_else(Error::type_mismatch::<Box<T>>)?;
    Ok(Some(&mut **slot as &mut dyn Any))
}

/// Why a codec could not store a value.
#[derive(Debug)]
pub(crate) enum WriteError {
    /// The slot is not the type the codec was built for.
    Mismatch,
    Value(ValueError),
}

impl From<ValueError> for WriteError {
    fn from(err: ValueError) -> Self {
        WriteError::Value(err)
    }
}

/// Reads and writes a primitive leaf through `dyn Any`.
///
/// Built once per leaf type and copied into every descriptor that ends in
/// that type, so the hot path is a downcast plus a conversion.
#[derive(Clone, Copy)]
pub struct ValueCodec {
    kind: PrimitiveKind,
    nullable: bool,
    read: fn(&dyn Any) -> Option<PropertyValue>,
    write: fn(&mut dyn Any, PropertyValue) -> Result<(), WriteError>,
    decode: fn(PropertyValue) -> Result<Box<dyn Any + Send>, WriteError>,
}

impl ValueCodec {
    pub fn primitive<P: Primitive>() -> Self {
        Self {
            kind: P::KIND,
            nullable: false,
            read: read_primitive::<P>,
            write: write_primitive::<P>,
            decode: decode_primitive::<P>,
        }
    }

    pub(crate) fn wrapping(
        inner: ValueCodec,
        nullable: bool,
        read: fn(&dyn Any) -> Option<PropertyValue>,
        write: fn(&mut dyn Any, PropertyValue) -> Result<(), WriteError>,
        decode: fn(PropertyValue) -> Result<Box<dyn Any + Send>, WriteError>,
    ) -> Self {
        Self {
            kind: inner.kind,
            nullable: inner.nullable || nullable,
            read,
            write,
            decode,
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Whether `PropertyValue::Null` is a legal value for this leaf.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub(crate) fn read(&self, slot: &dyn Any) -> Option<PropertyValue> {
        (self.read)(slot)
    }

    pub(crate) fn write(&self, slot: &mut dyn Any, value: PropertyValue) -> Result<(), WriteError> {
        (self.write)(slot, value)
    }

    pub(crate) fn decode(&self, value: PropertyValue) -> Result<Box<dyn Any + Send>, WriteError> {
        (self.decode)(value)
    }
}

impl fmt::Debug for ValueCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCodec")
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .finish()
    }
}

fn read_primitive<P: Primitive>(slot: &dyn Any) -> Option<PropertyValue> {
    slot.downcast_ref::<P>().map(P::to_value)
}

fn write_primitive<P: Primitive>(slot: &mut dyn Any, value: PropertyValue) -> Result<(), WriteError> {
    let slot = slot.downcast_mut::<P>().ok_or(WriteError::Mismatch)?;
    *slot = P::from_value(value)?;
    Ok(())
}

fn decode_primitive<P: Primitive>(value: PropertyValue) -> Result<Box<dyn Any + Send>, WriteError> {
    Ok(Box::new(P::from_value(value)?))
}
