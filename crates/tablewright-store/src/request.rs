//! Request and response types of the store client.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tablewright_types::{
    AttributeDefinition, GlobalIndex, Item, KeySchemaElement, LocalIndex, ProvisionedThroughput,
    StreamSpecification,
};

// ============================================================================
// Table Management
// ============================================================================

/// Creates a table together with all of its indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTableRequest {
    pub table_name: String,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub key_schema: Vec<KeySchemaElement>,
    pub provisioned_throughput: ProvisionedThroughput,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_secondary_indexes: Vec<GlobalIndex>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_secondary_indexes: Vec<LocalIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_specification: Option<StreamSpecification>,
}

/// Applies exactly one structural change to an existing table.
///
/// The store accepts a single in-flight change per table, so every update
/// carries one [`TableUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTableRequest {
    pub table_name: String,
    /// The table's full attribute definitions; required when creating an index.
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub change: TableUpdate,
}

/// The change carried by an [`UpdateTableRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableUpdate {
    Throughput(ProvisionedThroughput),
    Stream(StreamSpecification),
    GlobalIndex(GlobalIndexUpdate),
}

/// A global index change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlobalIndexUpdate {
    Create(GlobalIndex),
    Update {
        index_name: String,
        provisioned_throughput: ProvisionedThroughput,
    },
    Delete {
        index_name: String,
    },
}

impl GlobalIndexUpdate {
    pub fn index_name(&self) -> &str {
        match self {
            Self::Create(index) => &index.index_name,
            Self::Update { index_name, .. } | Self::Delete { index_name } => index_name,
        }
    }
}

// ============================================================================
// Reads
// ============================================================================

/// What a scan or query returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Select {
    #[default]
    AllAttributes,
    /// Only the number of matching items.
    Count,
}

/// One page of a table or index scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanRequest {
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_start_key: Option<Item>,
    pub select: Select,
    pub consistent_read: bool,
}

/// One page of a key-condition query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryRequest {
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    pub key_condition_expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expression_attribute_names: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expression_attribute_values: Item,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_start_key: Option<Item>,
    pub select: Select,
    pub consistent_read: bool,
}

/// One page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageOutput {
    /// Empty for [`Select::Count`] requests.
    #[serde(default)]
    pub items: Vec<Item>,
    /// Number of matching items in this page.
    pub count: u64,
    /// Set when the store has more results after this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_evaluated_key: Option<Item>,
}
