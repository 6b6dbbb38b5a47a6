// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Define a record type at runtime, build instances, copy and mutate them.
//!
//! Run with: `cargo run --example sensor_record`

use dynstruct::{Result, StructBuilder, StructInstance};
use std::sync::Arc;

fn main() -> Result<()> {
    // The field set is ordinary runtime data; it could just as well come
    // from a config file or a network peer.
    let schema = Arc::new(
        StructBuilder::new("SensorReading")
            .field::<u32>("sensor_id")
            .field::<f64>("temperature")
            .field::<u64>("timestamp")
            .field::<String>("label")
            .build()?,
    );

    println!("schema '{}' ({} bytes):", schema.name(), schema.size());
    for field in schema.fields() {
        println!(
            "  {:<12} {:>3} bytes @ offset {:>2}  ({})",
            field.name(),
            field.size(),
            field.offset(),
            field.type_desc().name()
        );
    }

    let mut reading = StructInstance::new(&schema);
    reading.set("sensor_id", 42u32)?;
    reading.set("temperature", 23.5f64)?;
    reading.set("timestamp", 1_702_900_000u64)?;
    reading.set("label", String::from("rooftop"))?;

    let mut copy = reading.clone();
    copy.set("temperature", 24.1f64)?;

    println!(
        "original: sensor {} at {}°C ({})",
        reading.get::<u32>("sensor_id")?,
        reading.get::<f64>("temperature")?,
        reading.get::<String>("label")?,
    );
    println!("copy:     sensor {} at {}°C", copy.get::<u32>("sensor_id")?, copy.get::<f64>("temperature")?);

    // Both instances destroy their fields when they fall out of scope.
    Ok(())
}
