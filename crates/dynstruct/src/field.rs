// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field descriptors binding a name and byte offset to a type descriptor.

use crate::descriptor::TypeDescriptor;
use crate::image::MemoryImage;
use std::sync::Arc;

/// One named field of a record schema: a [`TypeDescriptor`], a name, and
/// the byte offset of the field's slot within an instance buffer.
///
/// Created exactly once when a field is added to a schema; immutable
/// afterward.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    ty: Arc<TypeDescriptor>,
    offset: usize,
}

impl FieldDescriptor {
    pub(crate) fn new(ty: Arc<TypeDescriptor>, name: String, offset: usize) -> Self {
        Self { name, ty, offset }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptor of the field's type.
    pub fn type_desc(&self) -> &Arc<TypeDescriptor> {
        &self.ty
    }

    /// Byte offset of the field's slot within an instance buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Size of the field's slot in bytes.
    pub fn size(&self) -> usize {
        self.ty.size()
    }

    /// Default-construct this field in `image`.
    ///
    /// The schema guarantees the buffer is sized to at least
    /// `offset + size` and that the slot holds no live value.
    pub(crate) fn default_construct(&self, image: &mut MemoryImage) {
        let dst = image.slot_mut(self.offset, self.ty.size());
        unsafe { self.ty.default_construct(dst) }
    }

    /// Copy-construct this field from `from` into `to`, at the same offset
    /// in both images.
    pub(crate) fn copy_construct(&self, from: &MemoryImage, to: &mut MemoryImage) {
        let src = from.slot(self.offset, self.ty.size());
        let dst = to.slot_mut(self.offset, self.ty.size());
        unsafe { self.ty.copy_construct(src, dst) }
    }

    /// Destroy this field's value in `image`, leaving the slot
    /// uninitialized.
    pub(crate) fn destroy(&self, image: &mut MemoryImage) {
        let slot = image.slot_mut(self.offset, self.ty.size());
        unsafe { self.ty.destroy(slot) }
    }
}
