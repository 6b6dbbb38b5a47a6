// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical type descriptor cache.
//!
//! The registry hands out exactly one [`TypeDescriptor`] per compile-time
//! type, so descriptor identity (`Arc::ptr_eq`) stays stable for the
//! registry's lifetime and field descriptors can hold shared references
//! that remain valid as long as the registry lives.
//!
//! Concurrency policy: the registry is usable from any thread at any time.
//! The backing `DashMap` makes first-registration race-free — two threads
//! requesting a new type concurrently still observe a single canonical
//! descriptor. Descriptor creation runs no user code (it only captures
//! monomorphized function pointers and a size), so a registration can never
//! leave a partially constructed descriptor cached.

use crate::descriptor::{FieldValue, TypeDescriptor};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::{Arc, OnceLock};

/// Cache returning one canonical [`TypeDescriptor`] per compile-time type.
///
/// # Example
///
/// ```rust
/// use dynstruct::TypeRegistry;
/// use std::sync::Arc;
///
/// let registry = TypeRegistry::new();
/// let a = registry.descriptor_of::<u32>();
/// let b = registry.descriptor_of::<u32>();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: DashMap<TypeId, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by schemas that are not given a
    /// private one.
    pub fn global() -> Arc<TypeRegistry> {
        static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(TypeRegistry::new())).clone()
    }

    /// Return the canonical descriptor for `T`, creating and caching it on
    /// first request.
    pub fn descriptor_of<T: FieldValue>(&self) -> Arc<TypeDescriptor> {
        self.types
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                let desc = TypeDescriptor::of::<T>();
                log::trace!(
                    "[registry] registered type descriptor {} ({} bytes)",
                    desc.name(),
                    desc.size()
                );
                Arc::new(desc)
            })
            .clone()
    }

    /// Check whether a descriptor for `T` has been created.
    pub fn contains<T: 'static>(&self) -> bool {
        self.types.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_identity_is_stable() {
        let registry = TypeRegistry::new();
        let first = registry.descriptor_of::<String>();
        let second = registry.descriptor_of::<String>();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_types_get_distinct_descriptors() {
        let registry = TypeRegistry::new();
        let a = registry.descriptor_of::<u32>();
        let b = registry.descriptor_of::<i32>();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(registry.contains::<u32>());
        assert!(!registry.contains::<u64>());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_lookup_yields_one_descriptor() {
        let registry = Arc::new(TypeRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            handles.push(std::thread::spawn(move || {
                registry.descriptor_of::<Vec<u64>>()
            }));
        }
        let descriptors: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect();
        for desc in &descriptors[1..] {
            assert!(Arc::ptr_eq(&descriptors[0], desc));
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_global_registry_is_shared() {
        let a = TypeRegistry::global();
        let b = TypeRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
