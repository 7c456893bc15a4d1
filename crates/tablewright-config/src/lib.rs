//! Configuration management for tablewright
//!
//! Settings are merged from several sources, later ones winning:
//! 1. Built-in defaults
//! 2. ~/.config/tablewright/config.toml (user defaults)
//! 3. tablewright.toml (project config)
//! 4. tablewright.local.toml (local overrides, not committed)
//! 5. Environment variables (`TW_SECTION__KEY`, e.g. `TW_TABLE__READ_CAPACITY=10`)
//!
//! Command-line flags are applied on top by the caller.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use tablewright::{
    PageRequest, ProvisionedThroughput, ReconcilerConfig, SchemaOptions, StreamSpecification,
    StreamViewType,
};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::{LOCAL_CONFIG_FILE, PROJECT_CONFIG_FILE, Paths};

/// Main tablewright configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablewrightConfig {
    pub table: TableConfig,
    pub reconcile: ReconcileConfig,
    pub paging: PagingConfig,
}

/// Overrides applied when deriving a table schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Table name; the type name is used when unset.
    pub name: Option<String>,
    /// Read capacity for the table, overriding any key tag.
    pub read_capacity: Option<u64>,
    /// Write capacity for the table, overriding any key tag.
    pub write_capacity: Option<u64>,
    pub stream: StreamConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub enabled: bool,
    pub view_type: StreamViewType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub poll_interval_ms: u64,
    pub timeout_secs: u64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        let defaults = ReconcilerConfig::default();
        Self {
            poll_interval_ms: u64::try_from(defaults.poll_interval.as_millis()).unwrap_or(50),
            timeout_secs: defaults.convergence_timeout.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub default_page_size: u64,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 25,
        }
    }
}

impl TablewrightConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Rejects values no table or reconciler accepts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let capacities = [
            ("table.read_capacity", self.table.read_capacity),
            ("table.write_capacity", self.table.write_capacity),
        ];
        for (key, value) in capacities {
            if value == Some(0) {
                return Err(ConfigError::ValidationError(format!(
                    "{key} must be at least 1"
                )));
            }
        }
        if self.reconcile.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "reconcile.poll_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.reconcile.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "reconcile.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.paging.default_page_size == 0 {
            return Err(ConfigError::ValidationError(
                "paging.default_page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Derivation options carrying the `[table]` overrides.
    ///
    /// A capacity given on its own is paired with the default for the other.
    pub fn schema_options(&self) -> SchemaOptions {
        let throughput = match (self.table.read_capacity, self.table.write_capacity) {
            (None, None) => None,
            (read, write) => {
                let defaults = ProvisionedThroughput::default();
                Some(ProvisionedThroughput::new(
                    read.unwrap_or(defaults.read_capacity_units),
                    write.unwrap_or(defaults.write_capacity_units),
                ))
            }
        };
        let stream = self
            .table
            .stream
            .enabled
            .then(|| StreamSpecification::enabled(self.table.stream.view_type));

        SchemaOptions {
            table_name: self.table.name.clone(),
            throughput,
            stream,
        }
    }

    pub fn reconciler_config(&self) -> ReconcilerConfig {
        ReconcilerConfig::new(
            Duration::from_millis(self.reconcile.poll_interval_ms),
            Duration::from_secs(self.reconcile.timeout_secs),
        )
    }

    /// The first page at the configured default size.
    pub fn first_page(&self) -> PageRequest {
        PageRequest::first(self.paging.default_page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TablewrightConfig::default();
        assert_eq!(config.table.name, None);
        assert_eq!(config.reconcile.poll_interval_ms, 50);
        assert_eq!(config.reconcile.timeout_secs, 300);
        assert_eq!(config.paging.default_page_size, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_leave_schema_untouched() {
        let options = TablewrightConfig::default().schema_options();
        assert_eq!(options, SchemaOptions::default());
    }

    #[test]
    fn test_single_capacity_pairs_with_default() {
        let mut config = TablewrightConfig::default();
        config.table.write_capacity = Some(8);

        let options = config.schema_options();
        assert_eq!(options.throughput, Some(ProvisionedThroughput::new(5, 8)));
    }

    #[test]
    fn test_stream_enabled() {
        let mut config = TablewrightConfig::default();
        config.table.stream = StreamConfig {
            enabled: true,
            view_type: StreamViewType::KeysOnly,
        };

        assert_eq!(
            config.schema_options().stream,
            Some(StreamSpecification::enabled(StreamViewType::KeysOnly))
        );
    }

    #[test]
    fn test_reconciler_config() {
        let mut config = TablewrightConfig::default();
        config.reconcile.poll_interval_ms = 250;
        config.reconcile.timeout_secs = 30;

        let reconciler = config.reconciler_config();
        assert_eq!(reconciler.poll_interval, Duration::from_millis(250));
        assert_eq!(reconciler.convergence_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = TablewrightConfig::default();
        config.table.read_capacity = Some(0);

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("table.read_capacity"));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = TablewrightConfig::default();
        config.paging.default_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = TablewrightConfig::default();
        config.table.name = Some("Users".to_string());
        config.table.stream.enabled = true;

        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("view_type = \"NEW_AND_OLD_IMAGES\""));
        let parsed: TablewrightConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_huge_timeout_is_valid() {
        let mut config = TablewrightConfig::default();
        config.reconcile.timeout_secs = u64::MAX;

        config.validate().unwrap();
        assert_eq!(
            config.reconciler_config().convergence_timeout,
            Duration::from_secs(u64::MAX)
        );
    }
}
