//! Recursive expansion of a composite type into leaf accessors.

use crate::catalog::descriptor::{AccessorDescriptor, Step};
use crate::config::{CatalogConfig, CyclePolicy};
use crate::error::{Error, Result};
use crate::reflect::{PropertyInfo, ShapeKind, TypeShape};
use std::any::TypeId;
use std::sync::Arc;
use tracing::warn;

pub(crate) struct Walker<'c> {
    config: &'c CatalogConfig,
    root_type: &'static str,
    root_id: TypeId,
    // Composite types on the current expansion path, root first.
    stack: Vec<TypeId>,
    out: Vec<AccessorDescriptor>,
}

impl<'c> Walker<'c> {
    pub(crate) fn new(config: &'c CatalogConfig, root: &TypeShape) -> Self {
        Self {
            config,
            root_type: root.name(),
            root_id: root.id(),
            stack: Vec::new(),
            out: Vec::new(),
        }
    }

    /// Expand `root` (already unwrapped) into its flattened leaves.
    pub(crate) fn run(mut self, root: &TypeShape) -> Result<Vec<AccessorDescriptor>> {
        if let ShapeKind::Composite(_) = root.kind() {
            if self.config.max_depth == 0 {
                return Err(Error::DepthLimitExceeded {
                    path: self.root_type.to_string(),
                    limit: 0,
                });
            }
            self.stack.push(root.id());
            self.expand(root, None, &[])?;
        }
        Ok(self.out)
    }

    fn expand(&mut self, shape: &TypeShape, prefix: Option<&str>, path: &[Step]) -> Result<()> {
        let mut nested: Vec<(&Arc<PropertyInfo>, TypeShape, String)> = Vec::new();

        // Leaves of this level first, nested composites after, both in
        // declaration order.
        for property in shape.properties().iter().filter(|p| p.is_enumerable()) {
            let name = join(prefix, property.name());
            let property_type = property.property_type();
            match property_type.codec() {
                Some(codec) => self.out.push(AccessorDescriptor::new(
                    &name,
                    self.root_type,
                    self.root_id,
                    path.to_vec(),
                    Arc::clone(property),
                    codec,
                )),
                None => nested.push((property, property_type, name)),
            }
        }

        for (property, property_type, name) in nested {
            let mut steps = path.to_vec();
            steps.push(Step::Property(Arc::clone(property)));
            let owner: Arc<str> = Arc::from(name.as_str());
            let mut target = property_type;
            while let ShapeKind::Wrapper(wrapper) = target.kind() {
                let wrapper = *wrapper;
                steps.push(Step::Unwrap {
                    wrapper,
                    owner: Arc::clone(&owner),
                });
                target = wrapper.inner();
            }
            if !matches!(target.kind(), ShapeKind::Composite(_)) {
                // Opaque scalar without a codec: nothing to read.
                continue;
            }

            if self.stack.contains(&target.id()) {
                match self.config.cycle_policy {
                    CyclePolicy::Fail => {
                        return Err(Error::CyclicTypeGraph {
                            path: name,
                            type_name: target.name(),
                        });
                    }
                    CyclePolicy::Skip => {
                        warn!(
                            root = self.root_type,
                            path = %name,
                            type_name = target.name(),
                            "skipping re-entrant property in cyclic type graph"
                        );
                        continue;
                    }
                }
            }
            if self.stack.len() >= self.config.max_depth {
                return Err(Error::DepthLimitExceeded {
                    path: name,
                    limit: self.config.max_depth,
                });
            }

            self.stack.push(target.id());
            self.expand(&target, Some(&name), &steps)?;
            self.stack.pop();
        }
        Ok(())
    }
}

fn join(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{name}"),
        None => name.to_string(),
    }
}
