// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Public-API integration tests (doc-as-contract).
//!
//! These walk the documented usage patterns end to end. If one fails, the
//! crate documentation is misleading.
//!
//! Test levels:
//! - UC-01: schema definition and layout arithmetic
//! - UC-02: instance lifecycle through `StructInstance`
//! - UC-03: raw image lifecycle through `StructType`
//! - UC-04: precondition failures stay loud

use dynstruct::{StructBuilder, StructError, StructInstance, StructType};
use std::sync::Arc;

/// UC-01: layout follows declaration order with packed offsets.
#[test]
fn uc01_schema_definition_and_layout() {
    let mut schema = StructType::new("Header");
    schema.add_field::<i32>("id").expect("add id");
    schema.add_field::<i8>("flag").expect("add flag");

    assert_eq!(schema.size(), 5);
    assert_eq!(schema.field_offset("id").expect("offset"), 0);
    assert_eq!(schema.field_offset("flag").expect("offset"), 4);
    assert_eq!(schema.field_size("id").expect("size"), 4);
    assert!(!schema.is_frozen());
}

/// UC-02: instances default-construct, mutate, copy, and clean up.
#[test]
fn uc02_instance_lifecycle() {
    let schema = Arc::new(
        StructBuilder::new("Reading")
            .field::<u32>("sensor_id")
            .field::<f64>("temperature")
            .field::<String>("label")
            .build()
            .expect("build"),
    );

    let mut reading = StructInstance::new(&schema);
    assert_eq!(reading.get::<u32>("sensor_id").expect("get"), 0);
    assert_eq!(reading.get::<String>("label").expect("get"), "");

    reading.set("sensor_id", 42u32).expect("set");
    reading.set("temperature", 23.5f64).expect("set");
    reading.set("label", String::from("rooftop")).expect("set");

    let mut copy = reading.clone();
    copy.set("temperature", -4.0f64).expect("set");

    assert_eq!(reading.get::<f64>("temperature").expect("get"), 23.5);
    assert_eq!(copy.get::<f64>("temperature").expect("get"), -4.0);
    assert_eq!(copy.get::<String>("label").expect("get"), "rooftop");
}

/// UC-03: the raw image surface mirrors the instance surface.
#[test]
fn uc03_raw_image_lifecycle() {
    let mut schema = StructType::new("Pair");
    schema.add_field::<i32>("a").expect("add");
    schema.add_field::<f64>("b").expect("add");

    let mut image = schema.default_construct();
    assert_eq!(image.size(), schema.size());
    assert!(schema.is_frozen());

    schema.write_field(&mut image, "a", 7i32).expect("write");
    schema.write_field(&mut image, "b", 2.5f64).expect("write");

    let copy = schema.copy_construct(&image).expect("copy");
    assert_eq!(schema.read_field::<i32>(&copy, "a").expect("read"), 7);
    assert_eq!(schema.read_field::<f64>(&copy, "b").expect("read"), 2.5);

    schema.destroy(image).expect("destroy");
    schema.destroy(copy).expect("destroy");
}

/// UC-04: every precondition violation is a reported error, not a silent
/// acceptance.
#[test]
fn uc04_precondition_failures() {
    let mut schema = StructType::new("Strict");
    schema.add_field::<u32>("x").expect("add");

    assert_eq!(
        schema.add_field::<u32>("x").expect_err("duplicate"),
        StructError::DuplicateField("x".into())
    );

    let image = schema.default_construct();
    assert_eq!(
        schema.add_field::<u8>("y").expect_err("frozen"),
        StructError::SchemaFrozen("Strict".into())
    );
    assert_eq!(
        schema.field_offset("missing").expect_err("unknown"),
        StructError::UnknownField("missing".into())
    );

    // An image from another schema is rejected by size or by origin.
    let mut other = StructType::new("Other");
    other.add_field::<u32>("x").expect("add");
    let other_image = other.default_construct();
    assert!(schema.copy_construct(&other_image).is_err());

    other.destroy(other_image).expect("destroy");
    schema.destroy(image).expect("destroy");
}
