//! # tablewright-types: Core types for `tablewright`
//!
//! This crate contains the vocabulary shared by the schema compiler, the
//! store client seam and the reconciler:
//! - Attribute typing ([`ScalarType`], [`AttributeDefinition`])
//! - Key schemas ([`KeyType`], [`KeySchemaElement`])
//! - Secondary indexes ([`Projection`], [`GlobalIndex`], [`LocalIndex`])
//! - Capacity and streaming ([`ProvisionedThroughput`], [`StreamSpecification`])
//! - Lifecycle states ([`TableStatus`], [`IndexStatus`])
//! - Item values ([`AttributeValue`], [`Item`])
//!
//! Serialized shapes follow the store's JSON wire names (`AttributeName`,
//! `KeyType`, `HASH`, ...) so that a describe-table document produced by the
//! store's own tooling deserializes directly into these types.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

mod value;

pub use value::{AttributeValue, Item};

/// Read capacity applied when neither tags nor configuration specify one.
pub const DEFAULT_READ_CAPACITY: u64 = 5;

/// Write capacity applied when neither tags nor configuration specify one.
pub const DEFAULT_WRITE_CAPACITY: u64 = 1;

// ============================================================================
// Attribute Typing - Copy (simple enums)
// ============================================================================

/// Scalar storage type of a key attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// UTF-8 string (`S`).
    #[serde(rename = "S")]
    String,
    /// Arbitrary-precision number (`N`).
    #[serde(rename = "N")]
    Number,
    /// Opaque bytes (`B`).
    #[serde(rename = "B")]
    Binary,
}

impl ScalarType {
    /// Returns the store's one-letter type code.
    pub fn code(self) -> &'static str {
        match self {
            Self::String => "S",
            Self::Number => "N",
            Self::Binary => "B",
        }
    }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An attribute declared in a table's schema.
///
/// Only attributes that participate in the primary key or in an index key
/// are declared; plain data attributes never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    pub attribute_name: String,
    pub attribute_type: ScalarType,
}

impl AttributeDefinition {
    pub fn new(attribute_name: impl Into<String>, attribute_type: ScalarType) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            attribute_type,
        }
    }
}

// ============================================================================
// Key Schema
// ============================================================================

/// Role an attribute plays in a key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyType {
    /// Partition key.
    Hash,
    /// Sort key.
    Range,
}

impl Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash => write!(f, "hash"),
            Self::Range => write!(f, "range"),
        }
    }
}

/// One element of a key schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    pub attribute_name: String,
    pub key_type: KeyType,
}

impl KeySchemaElement {
    pub fn hash(attribute_name: impl Into<String>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            key_type: KeyType::Hash,
        }
    }

    pub fn range(attribute_name: impl Into<String>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            key_type: KeyType::Range,
        }
    }
}

/// Returns the hash element of a key schema, if any.
pub fn hash_element(key_schema: &[KeySchemaElement]) -> Option<&KeySchemaElement> {
    key_schema.iter().find(|e| e.key_type == KeyType::Hash)
}

/// Returns the range element of a key schema, if any.
pub fn range_element(key_schema: &[KeySchemaElement]) -> Option<&KeySchemaElement> {
    key_schema.iter().find(|e| e.key_type == KeyType::Range)
}

// ============================================================================
// Capacity & Streaming
// ============================================================================

/// Provisioned read/write capacity for a table or a global index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughput {
    pub read_capacity_units: u64,
    pub write_capacity_units: u64,
}

impl ProvisionedThroughput {
    pub fn new(read_capacity_units: u64, write_capacity_units: u64) -> Self {
        Self {
            read_capacity_units,
            write_capacity_units,
        }
    }
}

impl Default for ProvisionedThroughput {
    fn default() -> Self {
        Self::new(DEFAULT_READ_CAPACITY, DEFAULT_WRITE_CAPACITY)
    }
}

impl Display for ProvisionedThroughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read={} write={}",
            self.read_capacity_units, self.write_capacity_units
        )
    }
}

/// What a change stream record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamViewType {
    KeysOnly,
    NewImage,
    OldImage,
    #[default]
    NewAndOldImages,
}

/// Change stream settings of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamSpecification {
    pub stream_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_view_type: Option<StreamViewType>,
}

impl StreamSpecification {
    /// An enabled stream with the given view type.
    pub fn enabled(view_type: StreamViewType) -> Self {
        Self {
            stream_enabled: true,
            stream_view_type: Some(view_type),
        }
    }

    /// An explicit "streaming off" specification.
    pub fn disabled() -> Self {
        Self {
            stream_enabled: false,
            stream_view_type: None,
        }
    }
}

// ============================================================================
// Secondary Indexes
// ============================================================================

/// Which attributes a secondary index carries besides its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectionType {
    KeysOnly,
    All,
    Include,
}

impl Display for ProjectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeysOnly => write!(f, "keys_only"),
            Self::All => write!(f, "all"),
            Self::Include => write!(f, "include"),
        }
    }
}

/// Projection of a secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Projection {
    pub projection_type: ProjectionType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_key_attributes: Vec<String>,
}

impl Projection {
    pub fn all() -> Self {
        Self {
            projection_type: ProjectionType::All,
            non_key_attributes: Vec::new(),
        }
    }

    pub fn keys_only() -> Self {
        Self {
            projection_type: ProjectionType::KeysOnly,
            non_key_attributes: Vec::new(),
        }
    }

    pub fn include(non_key_attributes: Vec<String>) -> Self {
        Self {
            projection_type: ProjectionType::Include,
            non_key_attributes,
        }
    }
}

/// A global secondary index definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
    pub provisioned_throughput: ProvisionedThroughput,
}

/// A local secondary index definition.
///
/// The hash element is always the table's own hash key; local indexes have
/// no throughput of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
}

// ============================================================================
// Lifecycle States
// ============================================================================

/// Status of a table as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Creating,
    Updating,
    Deleting,
    Active,
    /// Any status this crate does not model explicitly.
    #[serde(other)]
    Unknown,
}

/// Status of a global secondary index as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexStatus {
    Creating,
    Updating,
    Deleting,
    Active,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests;
