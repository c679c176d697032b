//! Per-type cache of flattened property accessors.
//!
//! `PropertyCatalog::accessors` walks a type's shape once, producing one
//! [`AccessorDescriptor`] per reachable leaf, and memoizes the ordered result
//! for the catalog's lifetime. Entries are never invalidated: registered
//! shapes do not change while the process runs.

pub mod descriptor;
mod walk;

pub use descriptor::AccessorDescriptor;

use crate::config::CatalogConfig;
use crate::error::{Error, Result};
use crate::reflect::{Reflect, TypeHandle};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};
use walk::Walker;

/// Ordered accessors for one type, shared between all callers.
pub type Accessors = Arc<[AccessorDescriptor]>;

/// Memoizing accessor catalog.
///
/// Lookups are safe from any thread. Two threads missing on the same type
/// may both build it; the first sequence stored is the one every caller
/// sees afterwards.
#[derive(Default)]
pub struct PropertyCatalog {
    config: CatalogConfig,
    entries: DashMap<TypeId, Accessors>,
}

impl PropertyCatalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            entries: DashMap::new(),
        }
    }

    /// Process-wide catalog, configured from the environment on first use.
    pub fn global() -> &'static PropertyCatalog {
        static GLOBAL: OnceLock<PropertyCatalog> = OnceLock::new();
        GLOBAL.get_or_init(|| PropertyCatalog::new(CatalogConfig::from_env()))
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Flattened leaf accessors for `ty`.
    ///
    /// `Option<T>` and `Box<T>` are unwrapped first and share `T`'s entry.
    /// Builds that fail (cycles, depth limit) are not cached.
    pub fn accessors(&self, ty: TypeHandle) -> Result<Accessors> {
        if let Some(hit) = self.entries.get(&ty.id()) {
            trace!(type_name = ty.name(), "accessor cache hit");
            return Ok(Arc::clone(hit.value()));
        }

        let shape = ty.shape().unwrapped();
        let key = shape.id();
        let accessors = match self.entries.get(&key).map(|hit| Arc::clone(hit.value())) {
            Some(existing) => existing,
            None => {
                let built: Accessors = Walker::new(&self.config, &shape).run(&shape)?.into();
                debug!(
                    type_name = shape.name(),
                    accessors = built.len(),
                    "built property accessors"
                );
                Arc::clone(self.entries.entry(key).or_insert(built).value())
            }
        };
        if key != ty.id() {
            self.entries
                .entry(ty.id())
                .or_insert_with(|| Arc::clone(&accessors));
        }
        Ok(accessors)
    }

    pub fn accessors_of<T: Reflect>(&self) -> Result<Accessors> {
        self.accessors(TypeHandle::of::<T>())
    }

    /// Look up a single accessor by dotted name.
    pub fn find(&self, ty: TypeHandle, name: &str) -> Result<AccessorDescriptor> {
        self.accessors(ty)?
            .iter()
            .find(|descriptor| descriptor.name() == name)
            .cloned()
            .ok_or_else(|| Error::UnknownAccessor {
                type_name: ty.name(),
                name: name.to_string(),
            })
    }

    /// Whether `ty` already has a cached entry.
    pub fn is_cached(&self, ty: TypeHandle) -> bool {
        self.entries.contains_key(&ty.id())
    }

    /// Number of cached type keys, wrapper aliases included.
    pub fn cached_types(&self) -> usize {
        self.entries.len()
    }
}
