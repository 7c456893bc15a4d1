//! Schema configuration errors.
//!
//! Every variant is fatal and raised before any store call is made.

use thiserror::Error;

use tablewright_types::{KeyType, ProjectionType};

/// Which capacity value failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityKind {
    Read,
    Write,
}

impl std::fmt::Display for CapacityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Errors raised while deriving a table schema from a type description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A tag spec has no role element.
    #[error("{field}: tag spec '{spec}' is missing a role")]
    MissingRole { field: String, spec: String },

    /// An index spec has an empty index name.
    #[error("{field}: tag spec '{spec}' is missing an index name")]
    MissingIndexName { field: String, spec: String },

    /// A role the grammar does not know.
    #[error("{field}: unknown role '{role}'{}", index_suffix(.index.as_deref()))]
    UnknownRole {
        field: String,
        index: Option<String>,
        role: String,
    },

    /// A capacity element is not a positive integer.
    #[error("{field}: error parsing {kind} capacity unit{}: '{value}'", index_suffix(.index.as_deref()))]
    InvalidCapacity {
        field: String,
        index: Option<String>,
        kind: CapacityKind,
        value: String,
    },

    /// A projection type the grammar does not know.
    #[error("{field}: invalid projection type '{value}' for index {index}")]
    UnknownProjection {
        field: String,
        index: String,
        value: String,
    },

    /// `keys_only`/`all` declared together with `project` fields.
    #[error(
        "{field}: projection specified as {declared} but there are projected fields specified (index {index})"
    )]
    ProjectionConflict {
        field: String,
        index: String,
        declared: ProjectionType,
    },

    /// `include` declared but no field carries the `project` role.
    #[error("index {index}: projection specified as include but no projected fields specified")]
    IncludeWithoutFields { index: String },

    /// Capacity or projection elements on a spec whose role cannot carry them.
    #[error("{field}: unexpected arguments in tag spec '{spec}'")]
    UnexpectedArguments { field: String, spec: String },

    /// More than one throughput declaration in the key tags.
    #[error("{field}: multiple throughput specifications")]
    MultipleThroughput { field: String },

    /// Two fields claim the same key role.
    #[error("multiple {role} keys{}: '{first}' and '{second}'", index_suffix(.index.as_deref()))]
    DuplicateKeyRole {
        index: Option<String>,
        role: KeyType,
        first: String,
        second: String,
    },

    /// The table has no hash key.
    #[error("type {type_name} declares no hash key")]
    MissingHashKey { type_name: String },

    /// A global index has no hash key.
    #[error("global index {index} declares no hash key")]
    IndexMissingHashKey { index: String },

    /// A local index has no range key.
    #[error("local index {index} declares no range key")]
    IndexMissingRangeKey { index: String },

    /// A key-referenced attribute has no storable scalar type.
    #[error("attribute '{attribute}' is used as a key but has no scalar type")]
    KeyNotScalar { attribute: String },
}

fn index_suffix(index: Option<&str>) -> String {
    index.map(|i| format!(" for index {i}")).unwrap_or_default()
}

/// Result type for schema derivation.
pub type Result<T> = std::result::Result<T, ConfigError>;
