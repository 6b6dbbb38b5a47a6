// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # dynstruct - Runtime-defined struct layouts
//!
//! Record types whose field set is chosen at runtime, materialized as raw
//! byte buffers with type-safe construction, copying, and destruction of
//! every field in place. Useful wherever the shape of a record is data, not
//! code: scripting bridges, simulation genomes, column stores, generic
//! tooling.
//!
//! ## Quick Start
//!
//! ```rust
//! use dynstruct::{StructBuilder, StructInstance};
//! use std::sync::Arc;
//!
//! // Describe the record at runtime.
//! let schema = Arc::new(
//!     StructBuilder::new("SensorReading")
//!         .field::<u32>("sensor_id")
//!         .field::<f64>("temperature")
//!         .field::<String>("label")
//!         .build()?,
//! );
//!
//! // Build an instance; every field starts at its default value.
//! let mut reading = StructInstance::new(&schema);
//! reading.set("sensor_id", 42u32)?;
//! reading.set("temperature", 23.5f64)?;
//! reading.set("label", String::from("rooftop"))?;
//!
//! // Copies are deep and independent.
//! let copy = reading.clone();
//! assert_eq!(copy.get::<f64>("temperature")?, 23.5);
//!
//! // Fields are destroyed when instances go out of scope.
//! # Ok::<(), dynstruct::StructError>(())
//! ```
//!
//! ## Layout model
//!
//! ```text
//! StructType "SensorReading"          MemoryImage (36 bytes, packed)
//! +-------------------------+         +--------+----------+-----------+
//! | sensor_id : u32  @ 0    |  ---->  | 4 B    | 8 B      | 24 B      |
//! | temperature: f64 @ 4    |         | u32    | f64      | String    |
//! | label     : String @ 12 |         +--------+----------+-----------+
//! +-------------------------+         declaration order = layout order
//! ```
//!
//! Fields are laid out contiguously in declaration order with no padding or
//! reordering; a field's offset is the sum of the sizes of the fields
//! declared before it. Slots carry no alignment guarantee, so all access
//! goes through unaligned reads/writes and values are cloned out rather
//! than borrowed.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TypeDescriptor`] | Runtime capsule of a type's size and construct/copy/destroy ops |
//! | [`TypeRegistry`] | Cache returning one canonical descriptor per compile-time type |
//! | [`FieldDescriptor`] | Schema-bound pairing of a descriptor, a name, and a byte offset |
//! | [`StructType`] | Ordered field layout; freezes on first instantiation |
//! | [`MemoryImage`] | Raw, owned byte buffer backing one record instance |
//! | [`StructInstance`] | Owning instance wrapper with scoped field destruction |
//!
//! ## Freezing
//!
//! A schema freezes the first time an instance is built from it: adding a
//! field afterward fails with [`StructError::SchemaFrozen`] instead of
//! silently corrupting the layout under existing instances. A frozen schema
//! is read-only and safe to share across threads for concurrent instance
//! construction.

mod builder;
mod descriptor;
mod error;
mod field;
mod image;
mod instance;
mod registry;
mod struct_type;

pub use builder::StructBuilder;
pub use descriptor::{FieldValue, TypeDescriptor};
pub use error::{Result, StructError};
pub use field::FieldDescriptor;
pub use image::MemoryImage;
pub use instance::StructInstance;
pub use registry::TypeRegistry;
pub use struct_type::StructType;
