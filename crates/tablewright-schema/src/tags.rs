//! Tag grammar parsing.
//!
//! Three mini-languages, each a `;`-separated list of `,`-separated specs:
//!
//! ```text
//! key-tag   := key-spec   (';' key-spec)*
//! key-spec  := role [',' read-cap ',' write-cap]          role := hash | range
//!
//! gsi-tag   := gsi-spec   (';' gsi-spec)*
//! gsi-spec  := name ',' role [',' read-cap ',' write-cap [',' projection]]
//!                                                         role := hash | range | project
//!
//! lsi-tag   := lsi-spec   (';' lsi-spec)*
//! lsi-spec  := name ',' role [',' projection]             role := range | project
//!
//! read-cap, write-cap := '' | positive integer
//! projection          := '' | keys_only | all | include
//! ```
//!
//! Only a global `hash` spec may carry capacities and a projection, and only a
//! local `range` spec may carry a projection. An empty capacity takes the
//! default (5 read, 1 write).

use tablewright_types::{
    DEFAULT_READ_CAPACITY, DEFAULT_WRITE_CAPACITY, KeyType, ProjectionType, ProvisionedThroughput,
};

use crate::error::{CapacityKind, ConfigError, Result};

/// A parsed primary key spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    pub role: KeyType,
    /// Table throughput declared alongside the key, if any.
    pub throughput: Option<ProvisionedThroughput>,
}

/// Role of a field within a secondary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRole {
    Hash,
    Range,
    Project,
}

/// A parsed global index spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalIndexSpec {
    pub index_name: String,
    pub role: IndexRole,
    pub throughput: Option<ProvisionedThroughput>,
    /// `None` leaves the projection to be resolved after all fields are seen.
    pub projection: Option<ProjectionType>,
}

/// A parsed local index spec. Local indexes never take a `hash` role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIndexSpec {
    pub index_name: String,
    pub role: IndexRole,
    pub projection: Option<ProjectionType>,
}

/// Parses a primary key tag attached to `field`.
pub fn parse_key_tag(field: &str, tag: &str) -> Result<Vec<KeySpec>> {
    specs(tag)
        .map(|parts| {
            let role = match parts[0] {
                "hash" => KeyType::Hash,
                "range" => KeyType::Range,
                "" => {
                    return Err(ConfigError::MissingRole {
                        field: field.to_string(),
                        spec: parts.join(","),
                    });
                }
                other => {
                    return Err(ConfigError::UnknownRole {
                        field: field.to_string(),
                        index: None,
                        role: other.to_string(),
                    });
                }
            };
            if parts.len() > 3 {
                return Err(unexpected(field, &parts));
            }
            let throughput = if parts.len() > 1 {
                Some(parse_throughput(field, None, &parts[1..])?)
            } else {
                None
            };
            Ok(KeySpec { role, throughput })
        })
        .collect()
}

/// Parses a global index tag attached to `field`.
pub fn parse_global_index_tag(field: &str, tag: &str) -> Result<Vec<GlobalIndexSpec>> {
    specs(tag)
        .map(|parts| {
            let (index_name, role) = name_and_role(field, &parts)?;
            let args = &parts[2..];
            match role {
                IndexRole::Hash => {
                    if args.len() > 3 {
                        return Err(unexpected(field, &parts));
                    }
                    let throughput = if args.is_empty() {
                        None
                    } else {
                        Some(parse_throughput(field, Some(&index_name), args)?)
                    };
                    let projection = match args.get(2) {
                        Some(value) => parse_projection(field, &index_name, value)?,
                        None => None,
                    };
                    Ok(GlobalIndexSpec {
                        index_name,
                        role,
                        throughput,
                        projection,
                    })
                }
                IndexRole::Range | IndexRole::Project => {
                    if args.iter().any(|a| !a.is_empty()) {
                        return Err(unexpected(field, &parts));
                    }
                    Ok(GlobalIndexSpec {
                        index_name,
                        role,
                        throughput: None,
                        projection: None,
                    })
                }
            }
        })
        .collect()
}

/// Parses a local index tag attached to `field`.
pub fn parse_local_index_tag(field: &str, tag: &str) -> Result<Vec<LocalIndexSpec>> {
    specs(tag)
        .map(|parts| {
            let (index_name, role) = name_and_role(field, &parts)?;
            let args = &parts[2..];
            match role {
                IndexRole::Hash => Err(ConfigError::UnknownRole {
                    field: field.to_string(),
                    index: Some(index_name),
                    role: "hash".to_string(),
                }),
                IndexRole::Range => {
                    if args.len() > 1 {
                        return Err(unexpected(field, &parts));
                    }
                    let projection = match args.first() {
                        Some(value) => parse_projection(field, &index_name, value)?,
                        None => None,
                    };
                    Ok(LocalIndexSpec {
                        index_name,
                        role,
                        projection,
                    })
                }
                IndexRole::Project => {
                    if args.iter().any(|a| !a.is_empty()) {
                        return Err(unexpected(field, &parts));
                    }
                    Ok(LocalIndexSpec {
                        index_name,
                        role,
                        projection: None,
                    })
                }
            }
        })
        .collect()
}

/// Parses a capacity element. Empty means the default for that kind.
pub fn parse_capacity(
    field: &str,
    index: Option<&str>,
    kind: CapacityKind,
    value: &str,
) -> Result<u64> {
    if value.is_empty() {
        return Ok(match kind {
            CapacityKind::Read => DEFAULT_READ_CAPACITY,
            CapacityKind::Write => DEFAULT_WRITE_CAPACITY,
        });
    }
    match value.parse::<u64>() {
        Ok(units) if units > 0 => Ok(units),
        _ => Err(ConfigError::InvalidCapacity {
            field: field.to_string(),
            index: index.map(str::to_string),
            kind,
            value: value.to_string(),
        }),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Splits a tag into specs, each already split into trimmed elements.
fn specs(tag: &str) -> impl Iterator<Item = Vec<&str>> {
    tag.split(';')
        .map(str::trim)
        .filter(|spec| !spec.is_empty())
        .map(|spec| spec.split(',').map(str::trim).collect())
}

fn name_and_role(field: &str, parts: &[&str]) -> Result<(String, IndexRole)> {
    let index_name = parts[0];
    if index_name.is_empty() {
        return Err(ConfigError::MissingIndexName {
            field: field.to_string(),
            spec: parts.join(","),
        });
    }
    let role = match parts.get(1).copied() {
        None | Some("") => {
            return Err(ConfigError::MissingRole {
                field: field.to_string(),
                spec: parts.join(","),
            });
        }
        Some("hash") => IndexRole::Hash,
        Some("range") => IndexRole::Range,
        Some("project") => IndexRole::Project,
        Some(other) => {
            return Err(ConfigError::UnknownRole {
                field: field.to_string(),
                index: Some(index_name.to_string()),
                role: other.to_string(),
            });
        }
    };
    Ok((index_name.to_string(), role))
}

fn parse_throughput(field: &str, index: Option<&str>, args: &[&str]) -> Result<ProvisionedThroughput> {
    let read = parse_capacity(field, index, CapacityKind::Read, args[0])?;
    let write = parse_capacity(
        field,
        index,
        CapacityKind::Write,
        args.get(1).copied().unwrap_or_default(),
    )?;
    Ok(ProvisionedThroughput::new(read, write))
}

fn parse_projection(field: &str, index: &str, value: &str) -> Result<Option<ProjectionType>> {
    match value {
        "" => Ok(None),
        "keys_only" => Ok(Some(ProjectionType::KeysOnly)),
        "all" => Ok(Some(ProjectionType::All)),
        "include" => Ok(Some(ProjectionType::Include)),
        other => Err(ConfigError::UnknownProjection {
            field: field.to_string(),
            index: index.to_string(),
            value: other.to_string(),
        }),
    }
}

fn unexpected(field: &str, parts: &[&str]) -> ConfigError {
    ConfigError::UnexpectedArguments {
        field: field.to_string(),
        spec: parts.join(","),
    }
}
