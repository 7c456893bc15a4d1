//! Schema assembly.
//!
//! Combines the walked field specs and their parsed tags into the complete
//! [`DesiredSchema`] of a table.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tablewright_types::{
    AttributeDefinition, GlobalIndex, KeySchemaElement, KeyType, LocalIndex, Projection,
    ProjectionType, ProvisionedThroughput, StreamSpecification, hash_element,
};

use crate::description::TypeDescription;
use crate::error::{ConfigError, Result};
use crate::tags::{self, IndexRole};
use crate::walker::{self, FieldSpec};

/// Caller-supplied overrides applied on top of what the tags declare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Table name. Defaults to the type name.
    pub table_name: Option<String>,
    /// Table throughput. Takes precedence over a throughput in the key tags.
    pub throughput: Option<ProvisionedThroughput>,
    /// Stream configuration. Streams are never derived from tags.
    pub stream: Option<StreamSpecification>,
}

/// The complete schema a table should have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredSchema {
    pub table_name: String,
    /// Exactly the attributes referenced by some key, in field walk order.
    pub attribute_definitions: Vec<AttributeDefinition>,
    /// Hash element first, range second if present.
    pub key_schema: Vec<KeySchemaElement>,
    pub provisioned_throughput: ProvisionedThroughput,
    /// Global indexes in first-declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_indexes: Vec<GlobalIndex>,
    /// Local indexes in first-declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_indexes: Vec<LocalIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_specification: Option<StreamSpecification>,
}

impl DesiredSchema {
    /// Table key attribute names, hash first.
    pub fn key_attribute_names(&self) -> Vec<&str> {
        self.key_schema
            .iter()
            .map(|k| k.attribute_name.as_str())
            .collect()
    }

    /// Key attribute names of a global or local index, hash first.
    pub fn index_key_attribute_names(&self, index_name: &str) -> Option<Vec<&str>> {
        let key_schema = self
            .global_indexes
            .iter()
            .find(|i| i.index_name == index_name)
            .map(|i| &i.key_schema)
            .or_else(|| {
                self.local_indexes
                    .iter()
                    .find(|i| i.index_name == index_name)
                    .map(|i| &i.key_schema)
            })?;
        Some(
            key_schema
                .iter()
                .map(|k| k.attribute_name.as_str())
                .collect(),
        )
    }

    pub fn global_index(&self, index_name: &str) -> Option<&GlobalIndex> {
        self.global_indexes
            .iter()
            .find(|i| i.index_name == index_name)
    }

    /// True when `index_name` names a global or local index of this table.
    pub fn has_index(&self, index_name: &str) -> bool {
        self.global_indexes.iter().any(|i| i.index_name == index_name)
            || self.local_indexes.iter().any(|i| i.index_name == index_name)
    }
}

/// Derives the desired schema of the table that stores `description`.
///
/// # Errors
///
/// Returns a [`ConfigError`] for any malformed tag, missing or duplicated key
/// role, projection conflict, or key attribute without a scalar type.
pub fn derive_schema(description: &TypeDescription, options: &SchemaOptions) -> Result<DesiredSchema> {
    let specs = walker::walk(description);

    let (key_schema, tag_throughput) = table_keys(&description.name, &specs)?;
    let global_indexes = global_indexes(&specs)?;
    let table_hash = hash_element(&key_schema).ok_or_else(|| ConfigError::MissingHashKey {
        type_name: description.name.clone(),
    })?;
    let local_indexes = local_indexes(&specs, table_hash)?;
    let attribute_definitions =
        attribute_definitions(&specs, &key_schema, &global_indexes, &local_indexes)?;

    let table_name = options
        .table_name
        .clone()
        .unwrap_or_else(|| description.name.clone());
    let provisioned_throughput = options
        .throughput
        .or(tag_throughput)
        .unwrap_or_default();

    tracing::debug!(
        table = %table_name,
        attributes = attribute_definitions.len(),
        global_indexes = global_indexes.len(),
        local_indexes = local_indexes.len(),
        "derived table schema"
    );

    Ok(DesiredSchema {
        table_name,
        attribute_definitions,
        key_schema,
        provisioned_throughput,
        global_indexes,
        local_indexes,
        stream_specification: options.stream,
    })
}

// ============================================================================
// Table keys
// ============================================================================

fn table_keys(
    type_name: &str,
    specs: &[FieldSpec],
) -> Result<(Vec<KeySchemaElement>, Option<ProvisionedThroughput>)> {
    let mut hash: Option<String> = None;
    let mut range: Option<String> = None;
    let mut throughput: Option<ProvisionedThroughput> = None;

    for spec in specs {
        let Some(tag) = spec.tags.key.as_deref() else {
            continue;
        };
        for key in tags::parse_key_tag(&spec.qualified_name, tag)? {
            let slot = match key.role {
                KeyType::Hash => &mut hash,
                KeyType::Range => &mut range,
            };
            claim(slot, None, key.role, &spec.qualified_name)?;

            if let Some(declared) = key.throughput {
                if throughput.is_some() {
                    return Err(ConfigError::MultipleThroughput {
                        field: spec.qualified_name.clone(),
                    });
                }
                throughput = Some(declared);
            }
        }
    }

    let hash = hash.ok_or_else(|| ConfigError::MissingHashKey {
        type_name: type_name.to_string(),
    })?;
    Ok((key_elements(hash, range), throughput))
}

// ============================================================================
// Indexes
// ============================================================================

/// Projection being accumulated for one index.
#[derive(Debug, Default)]
struct ProjectionBuilder {
    declared: Option<ProjectionType>,
    /// Fields carrying the `project` role, in walk order.
    projected: Vec<String>,
}

impl ProjectionBuilder {
    fn declare(&mut self, declared: ProjectionType, field: &str, index: &str) -> Result<()> {
        if declared != ProjectionType::Include && !self.projected.is_empty() {
            return Err(ConfigError::ProjectionConflict {
                field: field.to_string(),
                index: index.to_string(),
                declared,
            });
        }
        self.declared = Some(declared);
        Ok(())
    }

    fn project(&mut self, field: &str, index: &str) -> Result<()> {
        if let Some(declared @ (ProjectionType::KeysOnly | ProjectionType::All)) = self.declared {
            return Err(ConfigError::ProjectionConflict {
                field: field.to_string(),
                index: index.to_string(),
                declared,
            });
        }
        self.projected.push(field.to_string());
        Ok(())
    }

    fn build(self, index: &str) -> Result<Projection> {
        match self.declared {
            Some(ProjectionType::KeysOnly) => Ok(Projection::keys_only()),
            Some(ProjectionType::All) => Ok(Projection::all()),
            Some(ProjectionType::Include) if self.projected.is_empty() => {
                Err(ConfigError::IncludeWithoutFields {
                    index: index.to_string(),
                })
            }
            Some(ProjectionType::Include) => Ok(Projection::include(self.projected)),
            None if self.projected.is_empty() => Ok(Projection::all()),
            None => Ok(Projection::include(self.projected)),
        }
    }
}

#[derive(Debug)]
struct IndexBuilder {
    name: String,
    hash: Option<String>,
    range: Option<String>,
    throughput: Option<ProvisionedThroughput>,
    projection: ProjectionBuilder,
}

impl IndexBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            hash: None,
            range: None,
            throughput: None,
            projection: ProjectionBuilder::default(),
        }
    }
}

fn entry<'a>(builders: &'a mut Vec<IndexBuilder>, name: &str) -> &'a mut IndexBuilder {
    let position = match builders.iter().position(|b| b.name == name) {
        Some(position) => position,
        None => {
            builders.push(IndexBuilder::new(name));
            builders.len() - 1
        }
    };
    &mut builders[position]
}

fn global_indexes(specs: &[FieldSpec]) -> Result<Vec<GlobalIndex>> {
    let mut builders: Vec<IndexBuilder> = Vec::new();

    for spec in specs {
        let Some(tag) = spec.tags.global_index.as_deref() else {
            continue;
        };
        let field = spec.qualified_name.as_str();
        for parsed in tags::parse_global_index_tag(field, tag)? {
            let index = entry(&mut builders, &parsed.index_name);
            match parsed.role {
                IndexRole::Hash => {
                    claim(&mut index.hash, Some(&index.name), KeyType::Hash, field)?;
                    index.throughput = parsed.throughput;
                    if let Some(projection) = parsed.projection {
                        index.projection.declare(projection, field, &index.name)?;
                    }
                }
                IndexRole::Range => {
                    claim(&mut index.range, Some(&index.name), KeyType::Range, field)?;
                }
                IndexRole::Project => index.projection.project(field, &index.name)?,
            }
        }
    }

    builders
        .into_iter()
        .map(|builder| {
            let hash = builder
                .hash
                .ok_or_else(|| ConfigError::IndexMissingHashKey {
                    index: builder.name.clone(),
                })?;
            let projection = builder.projection.build(&builder.name)?;
            Ok(GlobalIndex {
                key_schema: key_elements(hash, builder.range),
                projection,
                provisioned_throughput: builder.throughput.unwrap_or_default(),
                index_name: builder.name,
            })
        })
        .collect()
}

fn local_indexes(specs: &[FieldSpec], table_hash: &KeySchemaElement) -> Result<Vec<LocalIndex>> {
    let mut builders: Vec<IndexBuilder> = Vec::new();

    for spec in specs {
        let Some(tag) = spec.tags.local_index.as_deref() else {
            continue;
        };
        let field = spec.qualified_name.as_str();
        for parsed in tags::parse_local_index_tag(field, tag)? {
            let index = entry(&mut builders, &parsed.index_name);
            match parsed.role {
                IndexRole::Range => {
                    claim(&mut index.range, Some(&index.name), KeyType::Range, field)?;
                    if let Some(projection) = parsed.projection {
                        index.projection.declare(projection, field, &index.name)?;
                    }
                }
                IndexRole::Project => index.projection.project(field, &index.name)?,
                // Rejected by the tag parser.
                IndexRole::Hash => {}
            }
        }
    }

    builders
        .into_iter()
        .map(|builder| {
            let range = builder
                .range
                .ok_or_else(|| ConfigError::IndexMissingRangeKey {
                    index: builder.name.clone(),
                })?;
            let projection = builder.projection.build(&builder.name)?;
            Ok(LocalIndex {
                key_schema: vec![table_hash.clone(), KeySchemaElement::range(range)],
                projection,
                index_name: builder.name,
            })
        })
        .collect()
}

// ============================================================================
// Attribute definitions
// ============================================================================

fn attribute_definitions(
    specs: &[FieldSpec],
    key_schema: &[KeySchemaElement],
    global_indexes: &[GlobalIndex],
    local_indexes: &[LocalIndex],
) -> Result<Vec<AttributeDefinition>> {
    let referenced: BTreeSet<&str> = key_schema
        .iter()
        .chain(global_indexes.iter().flat_map(|i| i.key_schema.iter()))
        .chain(local_indexes.iter().flat_map(|i| i.key_schema.iter()))
        .map(|k| k.attribute_name.as_str())
        .collect();

    let mut emitted: BTreeSet<&str> = BTreeSet::new();
    let mut definitions = Vec::with_capacity(referenced.len());
    for spec in specs {
        let name = spec.qualified_name.as_str();
        if !referenced.contains(name) || !emitted.insert(name) {
            continue;
        }
        let scalar = spec.scalar_type.ok_or_else(|| ConfigError::KeyNotScalar {
            attribute: name.to_string(),
        })?;
        definitions.push(AttributeDefinition::new(name, scalar));
    }
    Ok(definitions)
}

// ============================================================================
// Helpers
// ============================================================================

/// Assigns `field` to a key role, rejecting a second claimant.
fn claim(slot: &mut Option<String>, index: Option<&str>, role: KeyType, field: &str) -> Result<()> {
    if let Some(first) = slot.as_ref() {
        return Err(ConfigError::DuplicateKeyRole {
            index: index.map(str::to_string),
            role,
            first: first.clone(),
            second: field.to_string(),
        });
    }
    *slot = Some(field.to_string());
    Ok(())
}

fn key_elements(hash: String, range: Option<String>) -> Vec<KeySchemaElement> {
    let mut elements = vec![KeySchemaElement::hash(hash)];
    elements.extend(range.map(KeySchemaElement::range));
    elements
}
