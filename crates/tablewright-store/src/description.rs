//! Live table descriptions as reported by the store.

use serde::{Deserialize, Serialize};
use tablewright_types::{
    AttributeDefinition, GlobalIndex, IndexStatus, KeySchemaElement, LocalIndex,
    ProvisionedThroughput, StreamSpecification, TableStatus,
};

/// The live definition and status of a table.
///
/// Field names follow the store's describe-table output, so that output can
/// be deserialized directly. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDescription {
    pub table_name: String,
    pub table_status: TableStatus,
    #[serde(default)]
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub key_schema: Vec<KeySchemaElement>,
    pub provisioned_throughput: ProvisionedThroughput,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_secondary_indexes: Vec<GlobalIndexDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_secondary_indexes: Vec<LocalIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_specification: Option<StreamSpecification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u64>,
}

impl TableDescription {
    /// Looks up a live global index by name.
    pub fn global_index(&self, index_name: &str) -> Option<&GlobalIndexDescription> {
        self.global_secondary_indexes
            .iter()
            .find(|i| i.definition.index_name == index_name)
    }

    pub fn is_active(&self) -> bool {
        self.table_status == TableStatus::Active
    }
}

/// A live global index: its definition plus its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalIndexDescription {
    #[serde(flatten)]
    pub definition: GlobalIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_status: Option<IndexStatus>,
}

impl GlobalIndexDescription {
    pub fn new(definition: GlobalIndex, index_status: IndexStatus) -> Self {
        Self {
            definition,
            index_status: Some(index_status),
        }
    }

    pub fn index_name(&self) -> &str {
        &self.definition.index_name
    }

    /// An index with no reported status is treated as active.
    pub fn is_active(&self) -> bool {
        matches!(self.index_status, None | Some(IndexStatus::Active))
    }
}
