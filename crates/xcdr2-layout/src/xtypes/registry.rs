// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry: read-only lookup of descriptors by type identity.
//!
//! A registry is populated before any traversal begins and is only read
//! afterwards, so one instance can be shared (e.g. behind an `Arc`) by
//! traversals running on different threads.

use super::{TypeDescriptor, TypeRef, TypeShape};
use crate::error::{LayoutError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Alias chains longer than this are treated as cyclic.
const MAX_ALIAS_DEPTH: usize = 64;

/// Registry that resolves type names to descriptors.
pub trait TypeRegistry: Send + Sync {
    /// Look up a descriptor by name.
    ///
    /// Fails with [`LayoutError::TypeNotFound`] when the name is unknown.
    fn lookup(&self, name: &str) -> Result<Arc<TypeDescriptor>>;
}

/// Simple [`HashMap`]-backed [`TypeRegistry`].
#[derive(Debug, Default, Clone)]
pub struct HashMapTypeRegistry {
    types: HashMap<String, Arc<TypeDescriptor>>,
}

impl HashMapTypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its own name, replacing any previous entry.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let descriptor = Arc::new(descriptor);
        if self
            .types
            .insert(descriptor.name.clone(), Arc::clone(&descriptor))
            .is_some()
        {
            log::debug!(
                "[xcdr2::registry] replaced descriptor for {}",
                descriptor.name
            );
        }
        descriptor
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeRegistry for HashMapTypeRegistry {
    fn lookup(&self, name: &str) -> Result<Arc<TypeDescriptor>> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| LayoutError::TypeNotFound {
                name: name.to_string(),
            })
    }
}

/// Resolve a reference to its descriptor without following aliases.
pub fn resolve(registry: &dyn TypeRegistry, type_ref: &TypeRef) -> Result<Arc<TypeDescriptor>> {
    match type_ref {
        TypeRef::Inline(descriptor) => Ok(Arc::clone(descriptor)),
        TypeRef::Named(name) => registry.lookup(name),
    }
}

/// Resolve a reference and follow aliases down to the underlying type.
pub fn resolve_alias(
    registry: &dyn TypeRegistry,
    type_ref: &TypeRef,
) -> Result<Arc<TypeDescriptor>> {
    let mut descriptor = resolve(registry, type_ref)?;
    for _ in 0..MAX_ALIAS_DEPTH {
        let target = match &descriptor.shape {
            TypeShape::Alias(target) => resolve(registry, target)?,
            _ => return Ok(descriptor),
        };
        descriptor = target;
    }
    Err(LayoutError::integrity(
        descriptor.display_name(),
        "alias chain does not terminate",
    ))
}
