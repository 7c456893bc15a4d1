//! Derive command implementation.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use tablewright::{
    DesiredSchema, KeySchemaElement, Projection, ProjectionType, hash_element, range_element,
};

use super::schema;
use crate::{OutputFormat, SchemaArgs};

pub fn run(file: &Path, args: &SchemaArgs, format: OutputFormat) -> Result<()> {
    let schema = schema::derive(file, args)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&schema)?),
        OutputFormat::Toml => println!("{}", toml::to_string_pretty(&schema)?),
        OutputFormat::Text => print!("{}", render(&schema)),
    }
    Ok(())
}

/// Human readable summary of a schema.
pub fn render(schema: &DesiredSchema) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Table {}", schema.table_name);
    let _ = writeln!(out, "  Key:        {}", keys(&schema.key_schema));
    let _ = writeln!(out, "  Throughput: {}", schema.provisioned_throughput);

    let attributes: Vec<String> = schema
        .attribute_definitions
        .iter()
        .map(|a| format!("{} ({})", a.attribute_name, a.attribute_type))
        .collect();
    let _ = writeln!(out, "  Attributes: {}", attributes.join(", "));

    match schema.stream_specification {
        Some(stream) if stream.stream_enabled => {
            let view = stream.stream_view_type.unwrap_or_default();
            let _ = writeln!(out, "  Stream:     {view:?}");
        }
        _ => {
            let _ = writeln!(out, "  Stream:     disabled");
        }
    }

    for index in &schema.global_indexes {
        let _ = writeln!(out);
        let _ = writeln!(out, "Global index {}", index.index_name);
        let _ = writeln!(out, "  Key:        {}", keys(&index.key_schema));
        let _ = writeln!(out, "  Projection: {}", projection(&index.projection));
        let _ = writeln!(out, "  Throughput: {}", index.provisioned_throughput);
    }
    for index in &schema.local_indexes {
        let _ = writeln!(out);
        let _ = writeln!(out, "Local index {}", index.index_name);
        let _ = writeln!(out, "  Key:        {}", keys(&index.key_schema));
        let _ = writeln!(out, "  Projection: {}", projection(&index.projection));
    }
    out
}

/// Hash element first, then range.
fn keys(key_schema: &[KeySchemaElement]) -> String {
    hash_element(key_schema)
        .into_iter()
        .chain(range_element(key_schema))
        .map(|k| format!("{} ({})", k.attribute_name, k.key_type))
        .collect::<Vec<_>>()
        .join(", ")
}

fn projection(projection: &Projection) -> String {
    match projection.projection_type {
        ProjectionType::Include => {
            format!("include [{}]", projection.non_key_attributes.join(", "))
        }
        other => other.to_string(),
    }
}
