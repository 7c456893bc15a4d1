//! # tablewright
//!
//! Declarative table schemas for key-value stores with secondary indexes.
//!
//! A record type is described once, with small tags on its fields naming the
//! primary key, global and local secondary indexes, projections and
//! throughput. From that description tablewright:
//!
//! - **Derives** the complete table schema ([`derive_schema`])
//! - **Reconciles** the live table onto it: create when absent, otherwise
//!   converge throughput, streaming and global indexes one change at a time
//!   ([`Reconciler`])
//! - **Pages** through scans and queries by offset or opaque continuation
//!   token ([`Table`], [`encode_cursor`], [`decode_cursor`])
//! - **Rewrites** `{field}` references in query expressions into placeholders
//!   ([`rewrite_expression`])
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────┐   ┌────────────────────────┐
//! │ TypeDescription  │ → │ DesiredSchema│ → │ plan → apply → poll    │
//! │ (tagged fields)  │   │  (assembler) │   │      (Reconciler)      │
//! └──────────────────┘   └──────────────┘   └───────────┬────────────┘
//!                                                       │ StoreClient
//!                         ┌──────────────┐   ┌──────────┴────────────┐
//!                         │ cursor codec │ ← │ Table (items, paging) │
//!                         └──────────────┘   └───────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use tablewright::{derive_schema, FieldDescriptor, PageRequest, ReconcilerConfig,
//!     SchemaOptions, Table, TypeDescription};
//!
//! let description = TypeDescription::new("Users")
//!     .field(FieldDescriptor::string("Id").key("hash"))
//!     .field(FieldDescriptor::string("Email").global_index("ByEmail,hash"));
//! let schema = derive_schema(&description, &SchemaOptions::default())?;
//!
//! let table = Table::new(store, schema);
//! table.ensure(&ReconcilerConfig::default())?;
//!
//! let first = table.scan_page(Some("ByEmail"), &PageRequest::first(25))?;
//! if let Some(token) = first.last_item_token {
//!     let next = table.scan_page(Some("ByEmail"), &PageRequest::first(25).with_token(token))?;
//! }
//! ```

mod codec;
mod cursor;
mod error;
mod expression;
mod page;
mod plan;
mod reconcile;
mod table;

pub use codec::{CodecError, JsonCodec, ValueCodec};
pub use cursor::{MAX_CURSOR_LEN, TokenError, decode_cursor, encode_cursor};
pub use error::{Error, Result};
pub use expression::{ExpressionError, ExpressionNames, rewrite_expression};
pub use page::{Page, PageRequest, Query};
pub use plan::{Mutation, create_table_request, plan, stream_changed};
pub use reconcile::{
    DEFAULT_CONVERGENCE_TIMEOUT, DEFAULT_POLL_INTERVAL, ReconcileError, ReconcileReport,
    Reconciler, ReconcilerConfig,
};
pub use table::Table;

// Re-export the schema compiler
pub use tablewright_schema::{
    ConfigError, DesiredSchema, FieldDescriptor, FieldKind, SchemaOptions, TypeDescription,
    derive_schema,
};

// Re-export the store seam
pub use tablewright_store::{
    CreateTableRequest, GlobalIndexDescription, GlobalIndexUpdate, PageOutput, QueryRequest,
    ScanRequest, Select, StoreClient, StoreError, TableDescription, TableUpdate,
    UpdateTableRequest,
};

// Re-export core types
pub use tablewright_types::{
    AttributeDefinition, AttributeValue, GlobalIndex, IndexStatus, Item, KeySchemaElement,
    KeyType, LocalIndex, Projection, ProjectionType, ProvisionedThroughput, ScalarType,
    StreamSpecification, StreamViewType, TableStatus, hash_element, range_element,
};
