//! Whole-object views built on the catalog: snapshots, JSON, and diffs.

use crate::catalog::PropertyCatalog;
use crate::error::{Error, Result};
use crate::reflect::Reflect;
use crate::value::PropertyValue;
use serde::Serialize;
use serde_json::{Map, Value};

/// A leaf whose value differs between two instances.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PropertyChange {
    pub name: String,
    pub before: PropertyValue,
    pub after: PropertyValue,
}

/// Every leaf of `instance` as `(dotted name, value)`, in catalog order.
pub fn snapshot<T: Reflect>(
    catalog: &PropertyCatalog,
    instance: &T,
) -> Result<Vec<(String, PropertyValue)>> {
    catalog
        .accessors_of::<T>()?
        .iter()
        .map(|descriptor| -> Result<(String, PropertyValue)> {
            Ok((descriptor.name().to_string(), descriptor.get_value(instance)?))
        })
        .collect()
}

/// Flat JSON object keyed by dotted name, preserving catalog order.
pub fn to_json<T: Reflect>(catalog: &PropertyCatalog, instance: &T) -> Result<Value> {
    let mut object = Map::new();
    for (name, value) in snapshot(catalog, instance)? {
        let json = serde_json::to_value(&value).map_err(|err| Error::Serialize {
            path: name.clone(),
            message: err.to_string(),
        })?;
        object.insert(name, json);
    }
    Ok(Value::Object(object))
}

/// Leaves that differ between `before` and `after`.
pub fn diff<T: Reflect>(
    catalog: &PropertyCatalog,
    before: &T,
    after: &T,
) -> Result<Vec<PropertyChange>> {
    let mut changes = Vec::new();
    for descriptor in catalog.accessors_of::<T>()?.iter() {
        let old = descriptor.get_value(before)?;
        let new = descriptor.get_value(after)?;
        if old != new {
            changes.push(PropertyChange {
                name: descriptor.name().to_string(),
                before: old,
                after: new,
            });
        }
    }
    Ok(changes)
}
