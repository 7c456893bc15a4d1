//! Plan command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tablewright::TableDescription;

use super::schema;
use crate::{OutputFormat, SchemaArgs};

/// Describe-table output is either the bare description or wrapped in `Table`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DescribeOutput {
    Wrapped {
        #[serde(rename = "Table")]
        table: TableDescription,
    },
    Bare(TableDescription),
}

pub fn load_live(path: &Path) -> Result<TableDescription> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read live description {}", path.display()))?;
    let output: DescribeOutput = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse live description {}", path.display()))?;

    Ok(match output {
        DescribeOutput::Wrapped { table } | DescribeOutput::Bare(table) => table,
    })
}

pub fn run(
    file: &Path,
    live: Option<&Path>,
    args: &SchemaArgs,
    format: OutputFormat,
) -> Result<()> {
    let desired = schema::derive(file, args)?;
    let live = live.map(load_live).transpose()?;

    if let Some(live) = &live {
        anyhow::ensure!(
            live.table_name == desired.table_name,
            "Live description is for table {}, but the schema is for table {}",
            live.table_name,
            desired.table_name
        );
    }

    let mutations = tablewright::plan(&desired, live.as_ref());
    tracing::debug!(table = %desired.table_name, mutations = mutations.len(), "planned");

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&mutations)?),
        OutputFormat::Toml => anyhow::bail!("Plans are printed as text or json"),
        OutputFormat::Text => {
            if mutations.is_empty() {
                println!("Table {} is up to date.", desired.table_name);
            } else {
                println!("Changes for table {}:", desired.table_name);
                for (step, mutation) in mutations.iter().enumerate() {
                    println!("  {}. {mutation}", step + 1);
                }
            }
        }
    }
    Ok(())
}
