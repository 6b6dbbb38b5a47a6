// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record schemas: ordered field layouts that build and manage instances.
//!
//! A [`StructType`] maps named, runtime-chosen fields to byte offsets in a
//! [`MemoryImage`]. Fields are laid out contiguously in declaration order
//! with no padding or reordering, so each field's offset is the sum of the
//! sizes of the fields declared before it.
//!
//! The schema freezes the first time an instance is built from it. Once an
//! instance exists, any later offset change would silently corrupt every
//! existing instance; freezing turns that latent corruption into an
//! immediate [`StructError::SchemaFrozen`] at definition time. After
//! freezing, a schema is read-only and may be shared across threads for
//! concurrent instance construction.

use crate::descriptor::FieldValue;
use crate::error::{Result, StructError};
use crate::field::FieldDescriptor;
use crate::image::MemoryImage;
use crate::registry::TypeRegistry;
use std::any::type_name;
use std::collections::HashMap;
use std::mem::{self, ManuallyDrop};
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Distinguishes images across schemas, including schemas that happen to
/// share a layout size.
static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// Ordered collection of named fields defining a record's memory layout.
///
/// # Example
///
/// ```rust
/// use dynstruct::StructType;
///
/// let mut schema = StructType::new("Header");
/// schema.add_field::<i32>("id")?;
/// schema.add_field::<i8>("flag")?;
/// assert_eq!(schema.size(), 5);
/// assert_eq!(schema.field_offset("flag")?, 4);
/// # Ok::<(), dynstruct::StructError>(())
/// ```
#[derive(Debug)]
pub struct StructType {
    name: String,
    fields: Vec<FieldDescriptor>,
    name_index: HashMap<String, usize>,
    registry: Arc<TypeRegistry>,
    total_size: usize,
    frozen: AtomicBool,
    id: u64,
}

impl StructType {
    /// Create an empty schema backed by the process-wide type registry.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_registry(name, TypeRegistry::global())
    }

    /// Create an empty schema backed by a caller-provided registry.
    ///
    /// Field descriptors share the registry's descriptors, so the registry
    /// must outlive every schema and instance derived from it — holding it
    /// by `Arc` makes that automatic.
    pub fn with_registry(name: impl Into<String>, registry: Arc<TypeRegistry>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            name_index: HashMap::new(),
            registry,
            total_size: 0,
            frozen: AtomicBool::new(false),
            id: NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total size in bytes of instances of this schema.
    pub fn size(&self) -> usize {
        self.total_size
    }

    /// Whether any instance has been built from this schema.
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Declared fields in declaration (= layout) order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Append a named field of type `T` at the current cumulative offset.
    ///
    /// Fails with [`StructError::SchemaFrozen`] once an instance exists and
    /// with [`StructError::DuplicateField`] on a name collision.
    pub fn add_field<T: FieldValue>(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.is_frozen() {
            return Err(StructError::SchemaFrozen(self.name.clone()));
        }
        if self.name_index.contains_key(&name) {
            return Err(StructError::DuplicateField(name));
        }
        let ty = self.registry.descriptor_of::<T>();
        self.name_index.insert(name.clone(), self.fields.len());
        let offset = self.total_size;
        self.total_size += ty.size();
        self.fields.push(FieldDescriptor::new(ty, name, offset));
        Ok(())
    }

    /// Position of a field in declaration order.
    pub fn field_index(&self, name: &str) -> Result<usize> {
        self.name_index
            .get(name)
            .copied()
            .ok_or_else(|| StructError::UnknownField(name.to_string()))
    }

    /// Descriptor of a field, if present.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.name_index.get(name).map(|&index| &self.fields[index])
    }

    /// Byte offset of a field's slot within an instance buffer.
    pub fn field_offset(&self, name: &str) -> Result<usize> {
        self.field_index(name).map(|index| self.fields[index].offset())
    }

    /// Size in bytes of a field's slot.
    pub fn field_size(&self, name: &str) -> Result<usize> {
        self.field_index(name).map(|index| self.fields[index].size())
    }

    /// Build an instance image with every field default-constructed, in
    /// declaration order. Freezes the schema.
    pub fn default_construct(&self) -> MemoryImage {
        let mut image = MemoryImage::new();
        image.resize(self.total_size);
        {
            let mut guard = ConstructGuard {
                fields: &self.fields,
                image: &mut image,
                constructed: 0,
            };
            for index in 0..guard.fields.len() {
                guard.fields[index].default_construct(guard.image);
                guard.constructed = index + 1;
            }
            mem::forget(guard);
        }
        image.set_origin(self.id);
        self.freeze();
        image
    }

    /// Build an instance image by copy-constructing every field from
    /// `from`, in declaration order. Freezes the schema.
    ///
    /// `from` must be a fully constructed image of this exact schema;
    /// anything else is rejected before any byte is touched.
    pub fn copy_construct(&self, from: &MemoryImage) -> Result<MemoryImage> {
        self.check_image(from)?;
        let mut to = MemoryImage::new();
        to.resize(self.total_size);
        {
            let mut guard = ConstructGuard {
                fields: &self.fields,
                image: &mut to,
                constructed: 0,
            };
            for index in 0..guard.fields.len() {
                guard.fields[index].copy_construct(from, guard.image);
                guard.constructed = index + 1;
            }
            mem::forget(guard);
        }
        to.set_origin(self.id);
        self.freeze();
        Ok(to)
    }

    /// Destroy every field of `image` and release its buffer.
    ///
    /// Consuming the image makes a second destroy of the same instance
    /// impossible to write. Fields are destroyed in declaration order,
    /// matching construction; the layout has no inter-field dependency, so
    /// the two walks stay offset-for-offset identical.
    pub fn destroy(&self, mut image: MemoryImage) -> Result<()> {
        self.destroy_in_place(&mut image)
    }

    /// Destroy every field of `image` in place, leaving it empty and
    /// unconstructed. Used by owning wrappers that cannot move the image
    /// out (e.g. in `Drop`).
    pub(crate) fn destroy_in_place(&self, image: &mut MemoryImage) -> Result<()> {
        self.check_image(image)?;
        for field in &self.fields {
            field.destroy(image);
        }
        image.clear();
        log::trace!("[struct_type] destroyed instance of '{}'", self.name);
        Ok(())
    }

    /// Read the value of field `name` out of `image` by clone.
    ///
    /// The requested `T` must be the exact type the field was declared
    /// with. Values are cloned out rather than borrowed: the packed layout
    /// gives slots no alignment guarantee, so no `&T` into the buffer can
    /// exist.
    pub fn read_field<T: Clone + 'static>(&self, image: &MemoryImage, name: &str) -> Result<T> {
        self.check_image(image)?;
        let field = self.checked_field::<T>(name)?;
        let src = image.slot(field.offset(), field.size());
        // The bitwise temporary aliases the value in the buffer and must
        // never be dropped.
        let original = ManuallyDrop::new(unsafe { ptr::read_unaligned(src.cast::<T>()) });
        Ok(T::clone(&original))
    }

    /// Replace the value of field `name` in `image`, dropping the old
    /// value.
    pub fn write_field<T: 'static>(
        &self,
        image: &mut MemoryImage,
        name: &str,
        value: T,
    ) -> Result<()> {
        self.check_image(image)?;
        let field = self.checked_field::<T>(name)?;
        let slot = image.slot_mut(field.offset(), field.size());
        unsafe {
            let old = ptr::read_unaligned(slot.cast::<T>());
            ptr::write_unaligned(slot.cast::<T>(), value);
            // Dropped only after the slot holds the new value, so a
            // panicking destructor cannot leave the slot dangling.
            drop(old);
        }
        Ok(())
    }

    /// Reject images this schema did not construct.
    fn check_image(&self, image: &MemoryImage) -> Result<()> {
        if image.size() != self.total_size {
            return Err(StructError::SizeMismatch {
                expected: self.total_size,
                got: image.size(),
            });
        }
        if image.origin() != Some(self.id) {
            return Err(StructError::ForeignImage {
                schema: self.name.clone(),
            });
        }
        Ok(())
    }

    fn checked_field<T: 'static>(&self, name: &str) -> Result<&FieldDescriptor> {
        let field = &self.fields[self.field_index(name)?];
        if !field.type_desc().is::<T>() {
            return Err(StructError::TypeMismatch {
                field: name.to_string(),
                expected: field.type_desc().name().to_string(),
                got: type_name::<T>().to_string(),
            });
        }
        Ok(field)
    }

    /// The construction methods are the only mutators of the frozen state.
    fn freeze(&self) {
        if !self.frozen.swap(true, Ordering::AcqRel) {
            log::debug!(
                "[struct_type] froze layout '{}': {} fields, {} bytes",
                self.name,
                self.fields.len(),
                self.total_size
            );
        }
    }
}

/// Tears down the already-constructed field prefix if a field's
/// `Default`/`Clone` panics midway through image construction.
struct ConstructGuard<'a> {
    fields: &'a [FieldDescriptor],
    image: &'a mut MemoryImage,
    constructed: usize,
}

impl Drop for ConstructGuard<'_> {
    fn drop(&mut self) {
        for field in &self.fields[..self.constructed] {
            field.destroy(self.image);
        }
    }
}
