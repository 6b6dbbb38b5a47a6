// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for StructType.

use crate::descriptor::FieldValue;
use crate::error::{Result, StructError};
use crate::registry::TypeRegistry;
use crate::struct_type::StructType;
use std::sync::Arc;

/// Builder for creating [`StructType`] schemas.
///
/// Field errors (duplicate names) are deferred and reported by
/// [`build`](Self::build); the first error wins.
///
/// # Example
///
/// ```rust
/// use dynstruct::StructBuilder;
///
/// let schema = StructBuilder::new("SensorReading")
///     .field::<u32>("sensor_id")
///     .field::<f64>("temperature")
///     .field::<u64>("timestamp")
///     .build()?;
///
/// assert_eq!(schema.size(), 4 + 8 + 8);
/// # Ok::<(), dynstruct::StructError>(())
/// ```
#[derive(Debug)]
pub struct StructBuilder {
    schema: StructType,
    error: Option<StructError>,
}

impl StructBuilder {
    /// Start a schema backed by the process-wide type registry.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: StructType::new(name),
            error: None,
        }
    }

    /// Start a schema backed by a caller-provided registry.
    pub fn with_registry(name: impl Into<String>, registry: Arc<TypeRegistry>) -> Self {
        Self {
            schema: StructType::with_registry(name, registry),
            error: None,
        }
    }

    /// Append a field of type `T`.
    pub fn field<T: FieldValue>(mut self, name: impl Into<String>) -> Self {
        if self.error.is_none() {
            if let Err(err) = self.schema.add_field::<T>(name) {
                self.error = Some(err);
            }
        }
        self
    }

    /// Finish the schema, surfacing the first deferred field error.
    pub fn build(self) -> Result<StructType> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.schema),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_lays_out_fields_in_order() {
        let schema = StructBuilder::new("Reading")
            .field::<u32>("sensor_id")
            .field::<f64>("temperature")
            .build()
            .expect("build");

        assert_eq!(schema.name(), "Reading");
        assert_eq!(schema.field_offset("sensor_id").expect("offset"), 0);
        assert_eq!(schema.field_offset("temperature").expect("offset"), 4);
        assert_eq!(schema.size(), 12);
    }

    #[test]
    fn test_builder_reports_first_duplicate() {
        let err = StructBuilder::new("Dup")
            .field::<u32>("a")
            .field::<f64>("a")
            .field::<u8>("a")
            .build()
            .expect_err("duplicate");
        assert_eq!(err, StructError::DuplicateField("a".into()));
    }

    #[test]
    fn test_builder_with_private_registry() {
        let registry = Arc::new(TypeRegistry::new());
        let schema = StructBuilder::with_registry("Private", registry.clone())
            .field::<u16>("a")
            .build()
            .expect("build");
        assert_eq!(schema.size(), 2);
        assert!(registry.contains::<u16>());
    }
}
