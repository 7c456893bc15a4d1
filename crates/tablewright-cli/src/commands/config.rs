//! Configuration commands.

use std::path::Path;

use anyhow::{Context, Result};
use tablewright_config::{Paths, TablewrightConfig};

use crate::OutputFormat;

/// Show the merged configuration.
pub fn show(project: &Path, format: OutputFormat) -> Result<()> {
    let config =
        TablewrightConfig::load_from_dir(project).context("Failed to load configuration")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Toml => println!("{}", toml::to_string_pretty(&config)?),
        OutputFormat::Text => {
            println!("tablewright configuration");
            println!("=========================\n");

            if !Paths::is_initialized(project) {
                println!("(no tablewright.toml in {}, showing defaults)\n", project.display());
            }

            println!("Table:");
            println!(
                "  Name: {}",
                config.table.name.as_deref().unwrap_or("(type name)")
            );
            println!(
                "  Read capacity: {}",
                config
                    .table
                    .read_capacity
                    .map_or("(from tags)".to_string(), |c| c.to_string())
            );
            println!(
                "  Write capacity: {}",
                config
                    .table
                    .write_capacity
                    .map_or("(from tags)".to_string(), |c| c.to_string())
            );
            if config.table.stream.enabled {
                println!("  Stream: {:?}", config.table.stream.view_type);
            } else {
                println!("  Stream: disabled");
            }
            println!();

            println!("Reconcile:");
            println!("  Poll interval: {} ms", config.reconcile.poll_interval_ms);
            println!("  Timeout: {} s", config.reconcile.timeout_secs);
            println!();

            println!("Paging:");
            println!("  Default page size: {}", config.paging.default_page_size);
        }
    }

    Ok(())
}

/// Validate configuration files.
pub fn validate(project: &Path) -> Result<()> {
    println!("Validating configuration in {}...", project.display());

    match TablewrightConfig::load_from_dir(project) {
        Ok(_) => {
            println!("Configuration is valid");
            Ok(())
        }
        Err(e) => {
            println!("Configuration validation failed:");
            println!("  {e:#}");
            Err(e)
        }
    }
}
