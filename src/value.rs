//! Boxed property values and the primitive types that produce them.
//!
//! Getters hand back a [`PropertyValue`] no matter which field they read, so
//! callers that serialize, log, or diff objects can treat every leaf the same
//! way. [`Primitive`] is the conversion contract between a concrete leaf type
//! and its boxed form.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::{Duration, SystemTime};
use thiserror::Error;

/// Category of a primitive leaf.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Bool,
    Char,
    Int,
    UInt,
    Float,
    String,
    Timestamp,
    Duration,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int => "int",
            PrimitiveKind::UInt => "uint",
            PrimitiveKind::Float => "float",
            PrimitiveKind::String => "string",
            PrimitiveKind::Timestamp => "timestamp",
            PrimitiveKind::Duration => "duration",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value read from (or written to) a leaf property.
///
/// `Null` stands for an empty nullable somewhere on the accessor path.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    /// Serialized as an RFC 3339 UTC string, which also covers instants
    /// before the Unix epoch.
    #[serde(serialize_with = "serialize_timestamp")]
    Timestamp(SystemTime),
    Duration(Duration),
}

fn serialize_timestamp<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    let utc: DateTime<Utc> = (*time).into();
    serializer.serialize_str(&utc.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Char(_) => "char",
            PropertyValue::Int(_) => "int",
            PropertyValue::UInt(_) => "uint",
            PropertyValue::Float(_) => "float",
            PropertyValue::Str(_) => "string",
            PropertyValue::Timestamp(_) => "timestamp",
            PropertyValue::Duration(_) => "duration",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(value) => Some(*value),
            PropertyValue::UInt(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

/// Reasons a [`PropertyValue`] cannot be stored into a leaf.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    #[error("expected a {expected} value, got {found}")]
    WrongKind {
        expected: PrimitiveKind,
        found: &'static str,
    },
    #[error("{value} does not fit in {target}")]
    OutOfRange { value: String, target: &'static str },
    #[error("null cannot be stored in non-nullable {target}")]
    NullNotAllowed { target: &'static str },
}

impl ValueError {
    fn wrong_kind(expected: PrimitiveKind, found: &PropertyValue) -> Self {
        ValueError::WrongKind {
            expected,
            found: found.kind_name(),
        }
    }
}

/// Conversion between a leaf type and [`PropertyValue`].
pub trait Primitive: Sized + Send + Sync + 'static {
    const KIND: PrimitiveKind;

    fn to_value(&self) -> PropertyValue;

    fn from_value(value: PropertyValue) -> Result<Self, ValueError>;
}

fn reject_null<T>(value: &PropertyValue) -> Result<(), ValueError> {
    if value.is_null() {
        return Err(ValueError::NullNotAllowed {
            target: std::any::type_name::<T>(),
        });
    }
    Ok(())
}

macro_rules! signed_primitive {
    ($($ty:ty),* $(,)?) => {$(
        impl Primitive for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::Int;

            fn to_value(&self) -> PropertyValue {
                PropertyValue::Int(*self as i64)
            }

            fn from_value(value: PropertyValue) -> Result<Self, ValueError> {
                reject_null::<$ty>(&value)?;
                let out_of_range = |raw: String| ValueError::OutOfRange {
                    value: raw,
                    target: stringify!($ty),
                };
                match value {
                    PropertyValue::Int(raw) => <$ty>::try_from(raw).map_err(|_| out_of_range(raw.to_string())),
                    PropertyValue::UInt(raw) => <$ty>::try_from(raw).map_err(|_| out_of_range(raw.to_string())),
                    other => Err(ValueError::wrong_kind(Self::KIND, &other)),
                }
            }
        }
    )*};
}

macro_rules! unsigned_primitive {
    ($($ty:ty),* $(,)?) => {$(
        impl Primitive for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::UInt;

            fn to_value(&self) -> PropertyValue {
                PropertyValue::UInt(*self as u64)
            }

            fn from_value(value: PropertyValue) -> Result<Self, ValueError> {
                reject_null::<$ty>(&value)?;
                let out_of_range = |raw: String| ValueError::OutOfRange {
                    value: raw,
                    target: stringify!($ty),
                };
                match value {
                    PropertyValue::UInt(raw) => <$ty>::try_from(raw).map_err(|_| out_of_range(raw.to_string())),
                    PropertyValue::Int(raw) => <$ty>::try_from(raw).map_err(|_| out_of_range(raw.to_string())),
                    other => Err(ValueError::wrong_kind(Self::KIND, &other)),
                }
            }
        }
    )*};
}

signed_primitive!(i8, i16, i32, i64, isize);
unsigned_primitive!(u8, u16, u32, u64, usize);

impl Primitive for f64 {
    const KIND: PrimitiveKind = PrimitiveKind::Float;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Float(*self)
    }

    fn from_value(value: PropertyValue) -> Result<Self, ValueError> {
        reject_null::<f64>(&value)?;
        match value {
            PropertyValue::Float(raw) => Ok(raw),
            PropertyValue::Int(raw) => Ok(raw as f64),
            PropertyValue::UInt(raw) => Ok(raw as f64),
            other => Err(ValueError::wrong_kind(Self::KIND, &other)),
        }
    }
}

impl Primitive for f32 {
    const KIND: PrimitiveKind = PrimitiveKind::Float;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Float(f64::from(*self))
    }

    fn from_value(value: PropertyValue) -> Result<Self, ValueError> {
        let raw = f64::from_value(value)?;
        if raw.is_finite() && raw.abs() > f64::from(f32::MAX) {
            return Err(ValueError::OutOfRange {
                value: raw.to_string(),
                target: "f32",
            });
        }
        Ok(raw as f32)
    }
}

impl Primitive for bool {
    const KIND: PrimitiveKind = PrimitiveKind::Bool;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Bool(*self)
    }

    fn from_value(value: PropertyValue) -> Result<Self, ValueError> {
        reject_null::<bool>(&value)?;
        match value {
            PropertyValue::Bool(raw) => Ok(raw),
            other => Err(ValueError::wrong_kind(Self::KIND, &other)),
        }
    }
}

impl Primitive for char {
    const KIND: PrimitiveKind = PrimitiveKind::Char;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Char(*self)
    }

    fn from_value(value: PropertyValue) -> Result<Self, ValueError> {
        reject_null::<char>(&value)?;
        match value {
            PropertyValue::Char(raw) => Ok(raw),
            other => Err(ValueError::wrong_kind(Self::KIND, &other)),
        }
    }
}

impl Primitive for String {
    const KIND: PrimitiveKind = PrimitiveKind::String;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Str(self.clone())
    }

    fn from_value(value: PropertyValue) -> Result<Self, ValueError> {
        reject_null::<String>(&value)?;
        match value {
            PropertyValue::Str(raw) => Ok(raw),
            PropertyValue::Char(raw) => Ok(raw.to_string()),
            other => Err(ValueError::wrong_kind(Self::KIND, &other)),
        }
    }
}

impl Primitive for SystemTime {
    const KIND: PrimitiveKind = PrimitiveKind::Timestamp;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Timestamp(*self)
    }

    fn from_value(value: PropertyValue) -> Result<Self, ValueError> {
        reject_null::<SystemTime>(&value)?;
        match value {
            PropertyValue::Timestamp(raw) => Ok(raw),
            other => Err(ValueError::wrong_kind(Self::KIND, &other)),
        }
    }
}

impl Primitive for Duration {
    const KIND: PrimitiveKind = PrimitiveKind::Duration;

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Duration(*self)
    }

    fn from_value(value: PropertyValue) -> Result<Self, ValueError> {
        reject_null::<Duration>(&value)?;
        match value {
            PropertyValue::Duration(raw) => Ok(raw),
            other => Err(ValueError::wrong_kind(Self::KIND, &other)),
        }
    }
}
