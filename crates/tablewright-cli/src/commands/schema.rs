//! Loading type descriptions and deriving their schemas.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tablewright::{DesiredSchema, TypeDescription, derive_schema};
use tablewright_config::{ConfigLoader, TablewrightConfig};

use crate::SchemaArgs;

/// Reads a type description, as JSON for `.json` files and TOML otherwise.
pub fn load_description(path: &Path) -> Result<TypeDescription> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read type description {}", path.display()))?;

    let description = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {} as JSON", path.display()))?
    } else {
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse {} as TOML", path.display()))?
    };
    Ok(description)
}

/// Loads the project configuration and applies the command-line overrides.
pub fn load_config(args: &SchemaArgs) -> Result<TablewrightConfig> {
    let mut config = ConfigLoader::new()
        .with_project_dir(&args.project)
        .load()
        .context("Failed to load configuration")?;

    if let Some(name) = &args.table_name {
        config.table.name = Some(name.clone());
    }
    if args.read.is_some() {
        config.table.read_capacity = args.read;
    }
    if args.write.is_some() {
        config.table.write_capacity = args.write;
    }
    if let Some(view) = args.stream {
        config.table.stream.enabled = true;
        config.table.stream.view_type = view.into();
    }

    config.validate()?;
    Ok(config)
}

/// Derives the desired schema of the description in `file`.
pub fn derive(file: &Path, args: &SchemaArgs) -> Result<DesiredSchema> {
    let description = load_description(file)?;
    let config = load_config(args)?;
    let schema = derive_schema(&description, &config.schema_options())
        .with_context(|| format!("Invalid schema tags in {}", file.display()))?;

    tracing::debug!(
        table = %schema.table_name,
        global_indexes = schema.global_indexes.len(),
        local_indexes = schema.local_indexes.len(),
        "derived schema"
    );
    Ok(schema)
}
