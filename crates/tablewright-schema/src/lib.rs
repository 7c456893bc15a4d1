//! # tablewright-schema: Declarative table schemas
//!
//! Derives the complete desired schema of a table from a described record
//! type. Fields carry three small tag languages:
//!
//! - `key`: primary key role and optional table throughput
//! - `global_index`: global secondary index membership, throughput, projection
//! - `local_index`: local secondary index membership and projection
//!
//! # Pipeline
//!
//! ```text
//! TypeDescription ──walk──▶ [FieldSpec] ──tags──▶ key / index specs
//!                                                     │
//!                                   SchemaOptions ────┤
//!                                                     ▼
//!                                               DesiredSchema
//! ```
//!
//! # Example
//!
//! ```
//! use tablewright_schema::{derive_schema, FieldDescriptor, SchemaOptions, TypeDescription};
//!
//! let description = TypeDescription::new("Users")
//!     .field(FieldDescriptor::string("Id").key("hash,10,5"))
//!     .field(FieldDescriptor::string("Email").global_index("ByEmail,hash"));
//!
//! let schema = derive_schema(&description, &SchemaOptions::default()).unwrap();
//! assert_eq!(schema.table_name, "Users");
//! assert_eq!(schema.provisioned_throughput.read_capacity_units, 10);
//! assert_eq!(schema.global_indexes[0].index_name, "ByEmail");
//! ```

mod assembler;
mod description;
mod error;
pub mod tags;
pub mod walker;

pub use assembler::{DesiredSchema, SchemaOptions, derive_schema};
pub use description::{CodecTag, FieldDescriptor, FieldKind, TypeDescription};
pub use error::{CapacityKind, ConfigError, Result};
pub use walker::{FieldSpec, FieldTags, walk};

#[cfg(test)]
mod tests;
