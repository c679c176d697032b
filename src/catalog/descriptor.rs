//! Flattened accessor for one leaf property.

use crate::error::{Error, Result};
use crate::reflect::{PropertyInfo, ValueCodec, WrapperShape};
use crate::reflect::shape::WriteError;
use crate::value::PropertyValue;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// One hop from an owner towards the leaf.
#[derive(Clone)]
pub(crate) enum Step {
    Property(Arc<PropertyInfo>),
    /// Unwrap the slot produced by the preceding property, named `owner`.
    Unwrap { wrapper: WrapperShape, owner: Arc<str> },
}

/// Accessor for a leaf reachable from a root type, e.g. `Address.City`.
///
/// The path from root to leaf is resolved when the catalog is built; reads
/// and writes only follow the stored projections.
#[derive(Clone)]
pub struct AccessorDescriptor {
    name: Arc<str>,
    property: Arc<PropertyInfo>,
    root_type: &'static str,
    root_id: TypeId,
    path: Arc<[Step]>,
    codec: ValueCodec,
}

impl AccessorDescriptor {
    /// `path` leads to the owner of `property`; the leaf hop is appended here.
    pub(crate) fn new(
        name: &str,
        root_type: &'static str,
        root_id: TypeId,
        mut path: Vec<Step>,
        property: Arc<PropertyInfo>,
        codec: ValueCodec,
    ) -> Self {
        path.push(Step::Property(Arc::clone(&property)));
        Self {
            name: Arc::from(name),
            property,
            root_type,
            root_id,
            path: path.into(),
            codec,
        }
    }

    /// Dotted path from the root type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Metadata of the leaf property.
    pub fn property(&self) -> &Arc<PropertyInfo> {
        &self.property
    }

    pub fn root_type(&self) -> &'static str {
        self.root_type
    }

    pub fn root_id(&self) -> TypeId {
        self.root_id
    }

    pub fn codec(&self) -> ValueCodec {
        self.codec
    }

    /// Number of property hops from the root; 1 for top-level properties.
    pub fn depth(&self) -> usize {
        self.path
            .iter()
            .filter(|step| matches!(step, Step::Property(_)))
            .count()
    }

    pub fn is_settable(&self) -> bool {
        self.property.has_setter()
    }

    /// Read the leaf from `instance`, which must be the root type.
    ///
    /// An empty nullable anywhere along the path reads as `Null`.
    pub fn get_value(&self, instance: &dyn Any) -> Result<PropertyValue> {
        self.check_root(instance.type_id())?;
        let mut slot = instance;
        for step in self.path.iter() {
            slot = match step {
                Step::Property(property) => property.project(slot).ok_or(Error::TypeMismatch {
                    expected: property.declaring_type(),
                })?,
                Step::Unwrap { wrapper, .. } => match wrapper.unwrap(slot)? {
                    Some(inner) => inner,
                    None => return Ok(PropertyValue::Null),
                },
            };
        }
        self.codec.read(slot).ok_or(Error::TypeMismatch {
            expected: self.property.property_type_name(),
        })
    }

    /// Store `value` into the leaf of `instance`.
    ///
    /// Fails when the leaf has no setter or an intermediate nullable is
    /// empty; nothing is allocated along the way.
    pub fn set_value(&self, instance: &mut dyn Any, value: PropertyValue) -> Result<()> {
        if !self.property.has_setter() {
            return Err(Error::MissingSetter {
                declaring_type: self.property.declaring_type(),
                property: self.name.to_string(),
            });
        }
        self.check_root((*instance).type_id())?;
        let mut slot = instance;
        for step in self.path.iter() {
            slot = match step {
                Step::Property(property) => {
                    property.project_mut(slot).ok_or(Error::TypeMismatch {
                        expected: property.declaring_type(),
                    })?
                }
                Step::Unwrap { wrapper, owner } => match wrapper.unwrap_mut(slot)? {
                    Some(inner) => inner,
                    None => {
                        return Err(Error::EmptyIntermediate {
                            path: self.name.to_string(),
                            empty: owner.to_string(),
                        });
                    }
                },
            };
        }
        write_leaf(self.codec, &self.property, &self.name, slot, value)
    }

    fn check_root(&self, actual: TypeId) -> Result<()> {
        if actual != self.root_id {
            return Err(Error::TypeMismatch {
                expected: self.root_type,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for AccessorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorDescriptor")
            .field("name", &self.name)
            .field("root_type", &self.root_type)
            .field("kind", &self.codec.kind())
            .field("settable", &self.is_settable())
            .finish()
    }
}

/// Decode `value` into a leaf slot, translating codec failures.
pub(crate) fn write_leaf(
    codec: ValueCodec,
    property: &PropertyInfo,
    path: &str,
    slot: &mut dyn Any,
    value: PropertyValue,
) -> Result<()> {
    codec.write(slot, value).map_err(|err| match err {
        WriteError::Mismatch => Error::TypeMismatch {
            expected: property.property_type_name(),
        },
        WriteError::Value(source) => Error::Value {
            path: path.to_string(),
            source,
        },
    })
}
