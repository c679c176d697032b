//! Property metadata and the compiled projections that read it.

use crate::reflect::Reflect;
use crate::reflect::shape::TypeShape;
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Borrow a property's slot out of its owner.
pub type Projector = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;

/// Mutable counterpart of [`Projector`].
pub type MutProjector =
    Arc<dyn for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Visibility {
    Public,
    Private,
}

/// Metadata for a single property of a composite type.
///
/// The flags mirror what a reflection host reports: only public, non-static,
/// non-indexed properties with a getter take part in enumeration.
pub struct PropertyInfo {
    name: &'static str,
    declaring_type: &'static str,
    declaring_id: TypeId,
    property_type: fn() -> TypeShape,
    property_type_name: &'static str,
    visibility: Visibility,
    is_static: bool,
    parameters: usize,
    getter: Option<Projector>,
    getter_mut: MutProjector,
    has_setter: bool,
}

impl PropertyInfo {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declaring_type(&self) -> &'static str {
        self.declaring_type
    }

    pub fn declaring_id(&self) -> TypeId {
        self.declaring_id
    }

    /// Resolve the property's type. Deferred so self-referential graphs can
    /// be described at all.
    pub fn property_type(&self) -> TypeShape {
        (self.property_type)()
    }

    pub fn property_type_name(&self) -> &'static str {
        self.property_type_name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Number of index parameters; zero for plain properties.
    pub fn parameters(&self) -> usize {
        self.parameters
    }

    pub fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    pub fn has_setter(&self) -> bool {
        self.has_setter
    }

    /// Whether the catalog lists this property.
    pub fn is_enumerable(&self) -> bool {
        self.visibility == Visibility::Public
            && !self.is_static
            && self.parameters == 0
            && self.is_readable()
    }

    pub(crate) fn project<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any> {
        self.getter.as_ref().and_then(|getter| getter(owner))
    }

    /// Mutable projection. Available even for read-only properties so that
    /// nested writable members stay reachable.
    pub(crate) fn project_mut<'a>(&self, owner: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        (self.getter_mut)(owner)
    }
}

impl fmt::Debug for PropertyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyInfo")
            .field("name", &self.name)
            .field("declaring_type", &self.declaring_type)
            .field("property_type", &self.property_type_name)
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .field("parameters", &self.parameters)
            .field("readable", &self.is_readable())
            .field("has_setter", &self.has_setter)
            .finish()
    }
}

/// Builder for one property of `T`.
pub struct PropertyBuilder<T> {
    name: &'static str,
    property_type: fn() -> TypeShape,
    property_type_name: &'static str,
    visibility: Visibility,
    is_static: bool,
    parameters: usize,
    getter: Option<Projector>,
    getter_mut: MutProjector,
    has_setter: bool,
    _owner: PhantomData<fn(&T)>,
}

impl<T: Reflect> PropertyBuilder<T> {
    /// A public field with both accessors.
    pub fn field<F: Reflect>(
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        let getter: Projector = Arc::new(shared(move |owner| {
            owner.downcast_ref::<T>().map(|owner| get(owner) as &dyn Any)
        }));
        let getter_mut: MutProjector = Arc::new(exclusive(move |owner| {
            owner
                .downcast_mut::<T>()
                .map(|owner| get_mut(owner) as &mut dyn Any)
        }));
        Self {
            name,
            property_type: F::shape,
            property_type_name: std::any::type_name::<F>(),
            visibility: Visibility::Public,
            is_static: false,
            parameters: 0,
            getter: Some(getter),
            getter_mut,
            has_setter: true,
            _owner: PhantomData,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.has_setter = false;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.getter = None;
        self
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn indexed(mut self, parameters: usize) -> Self {
        self.parameters = parameters;
        self
    }

    pub(crate) fn build(self, declaring_type: &'static str) -> PropertyInfo {
        PropertyInfo {
            name: self.name,
            declaring_type,
            declaring_id: TypeId::of::<T>(),
            property_type: self.property_type,
            property_type_name: self.property_type_name,
            visibility: self.visibility,
            is_static: self.is_static,
            parameters: self.parameters,
            getter: self.getter,
            getter_mut: self.getter_mut,
            has_setter: self.has_setter,
        }
    }
}

// Pin closure signatures to the higher-ranked form the projector types need.
fn shared<F>(f: F) -> F
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any>,
{
    f
}

fn exclusive<F>(f: F) -> F
where
    F: for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any>,
{
    f
}
