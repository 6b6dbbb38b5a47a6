// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Owned record instances with scoped field destruction.
//!
//! A [`StructInstance`] pairs a memory image with the schema that built it,
//! so construction and destruction share a single owning lifetime: when the
//! instance goes out of scope, every field is destroyed through the schema
//! before the buffer is released. This is the recommended surface; raw
//! [`MemoryImage`](crate::MemoryImage) handling stays available for callers
//! that manage lifetimes themselves.

use crate::error::Result;
use crate::image::MemoryImage;
use crate::struct_type::StructType;
use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr;
use std::sync::Arc;

/// One record instance, owning its memory image and destroying its fields
/// on drop.
///
/// # Example
///
/// ```rust
/// use dynstruct::{StructInstance, StructType};
/// use std::sync::Arc;
///
/// let mut schema = StructType::new("Point");
/// schema.add_field::<f64>("x")?;
/// schema.add_field::<f64>("y")?;
/// let schema = Arc::new(schema);
///
/// let mut point = StructInstance::new(&schema);
/// point.set("x", 1.5f64)?;
/// assert_eq!(point.get::<f64>("x")?, 1.5);
/// assert_eq!(point.get::<f64>("y")?, 0.0);
/// # Ok::<(), dynstruct::StructError>(())
/// ```
pub struct StructInstance {
    ty: Arc<StructType>,
    image: MemoryImage,
}

impl StructInstance {
    /// Default-construct an instance of `ty`. Freezes the schema.
    pub fn new(ty: &Arc<StructType>) -> Self {
        let image = ty.default_construct();
        Self {
            ty: ty.clone(),
            image,
        }
    }

    /// The schema this instance was built from.
    pub fn struct_type(&self) -> &Arc<StructType> {
        &self.ty
    }

    /// The backing memory image.
    pub fn image(&self) -> &MemoryImage {
        &self.image
    }

    /// Read field `name` by clone.
    pub fn get<T: Clone + 'static>(&self, name: &str) -> Result<T> {
        self.ty.read_field(&self.image, name)
    }

    /// Replace the value of field `name`, dropping the old value.
    pub fn set<T: 'static>(&mut self, name: &str, value: T) -> Result<()> {
        self.ty.write_field(&mut self.image, name, value)
    }

    /// Give up scoped destruction and hand the raw parts to the caller,
    /// who becomes responsible for `StructType::destroy`.
    pub fn into_raw(self) -> (Arc<StructType>, MemoryImage) {
        let this = ManuallyDrop::new(self);
        // Fields are moved out exactly once; `Drop` no longer runs.
        let ty = unsafe { ptr::read(&this.ty) };
        let image = unsafe { ptr::read(&this.image) };
        (ty, image)
    }
}

impl Clone for StructInstance {
    fn clone(&self) -> Self {
        let image = self
            .ty
            .copy_construct(&self.image)
            .expect("instance image always matches its schema");
        Self {
            ty: self.ty.clone(),
            image,
        }
    }
}

impl Drop for StructInstance {
    fn drop(&mut self) {
        if let Err(err) = self.ty.destroy_in_place(&mut self.image) {
            // Unreachable while the owning invariant holds; never panic in
            // a destructor over it.
            log::error!(
                "[instance] leaking fields of '{}': {}",
                self.ty.name(),
                err
            );
        }
    }
}

impl fmt::Debug for StructInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructInstance")
            .field("struct_type", &self.ty.name())
            .field("size", &self.image.size())
            .finish()
    }
}
