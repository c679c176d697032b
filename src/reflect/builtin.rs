//! `Reflect` for the built-in leaf types and the two wrappers.
//!
//! `Option<T>` is the nullable wrapper: it is primitive when `T` is and
//! otherwise transparent to enumeration. `Box<T>` is pure indirection, which
//! is also what lets recursive types be registered at all.

use crate::reflect::Reflect;
use crate::reflect::shape::{TypeShape, ValueCodec, WrapperShape, WriteError};
use crate::value::PropertyValue;
use std::any::Any;
use std::time::{Duration, SystemTime};

/// Implement [`Reflect`] for types that already implement
/// [`Primitive`](crate::value::Primitive).
#[macro_export]
macro_rules! reflect_primitive {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::reflect::Reflect for $ty {
            fn shape() -> $crate::reflect::TypeShape {
                $crate::reflect::TypeShape::scalar::<$ty>()
            }

            fn codec() -> ::std::option::Option<$crate::reflect::ValueCodec> {
                ::std::option::Option::Some($crate::reflect::ValueCodec::primitive::<$ty>())
            }
        }
    )*};
}

reflect_primitive!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char, String,
    SystemTime, Duration,
);

impl<T: Reflect> Reflect for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::wrapper::<Self>(WrapperShape::nullable::<T>())
    }

    fn codec() -> Option<ValueCodec> {
        T::codec().map(|inner| {
            ValueCodec::wrapping(
                inner,
                true,
                read_option::<T>,
                write_option::<T>,
                decode_option::<T>,
            )
        })
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn shape() -> TypeShape {
        TypeShape::wrapper::<Self>(WrapperShape::boxed::<T>())
    }

    fn codec() -> Option<ValueCodec> {
        T::codec().map(|inner| {
            ValueCodec::wrapping(inner, false, read_box::<T>, write_box::<T>, decode_box::<T>)
        })
    }
}

fn inner_codec<T: Reflect>() -> Result<ValueCodec, WriteError> {
    T::codec().ok_or(WriteError::Mismatch)
}

fn decode_inner<T: Reflect>(value: PropertyValue) -> Result<T, WriteError> {
    let boxed = inner_codec::<T>()?.decode(value)?;
    boxed
        .downcast::<T>()
        .map(|inner| *inner)
        .map_err(|_| WriteError::Mismatch)
}

fn read_option<T: Reflect>(slot: &dyn Any) -> Option<PropertyValue> {
    match slot.downcast_ref::<Option<T>>()? {
        None => Some(PropertyValue::Null),
        Some(inner) => T::codec()?.read(inner),
    }
}

fn write_option<T: Reflect>(slot: &mut dyn Any, value: PropertyValue) -> Result<(), WriteError> {
    let slot = slot
        .downcast_mut::<Option<T>>()
        .ok_or(WriteError::Mismatch)?;
    if value.is_null() {
        *slot = None;
        return Ok(());
    }
    if let Some(inner) = slot.as_mut() {
        return inner_codec::<T>()?.write(inner, value);
    }
    *slot = Some(decode_inner::<T>(value)?);
    Ok(())
}

fn decode_option<T: Reflect>(value: PropertyValue) -> Result<Box<dyn Any + Send>, WriteError> {
    if value.is_null() {
        return Ok(Box::new(None::<T>));
    }
    Ok(Box::new(Some(decode_inner::<T>(value)?)))
}

fn read_box<T: Reflect>(slot: &dyn Any) -> Option<PropertyValue> {
    let slot = slot.downcast_ref::<Box<T>>()?;
    T::codec()?.read(&**slot)
}

fn write_box<T: Reflect>(slot: &mut dyn Any, value: PropertyValue) -> Result<(), WriteError> {
    let slot = slot.downcast_mut::<Box<T>>().ok_or(WriteError::Mismatch)?;
    inner_codec::<T>()?.write(&mut **slot, value)
}

fn decode_box<T: Reflect>(value: PropertyValue) -> Result<Box<dyn Any + Send>, WriteError> {
    Ok(Box::new(Box::new(decode_inner::<T>(value)?)))
}
