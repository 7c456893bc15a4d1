//! # tablewright-store: Store client abstraction
//!
//! The remote key-value store is reached only through the [`StoreClient`]
//! trait. This crate defines that trait together with its request and
//! response shapes:
//!
//! - Table management: [`CreateTableRequest`], [`UpdateTableRequest`],
//!   [`TableDescription`]
//! - Reads: [`ScanRequest`], [`QueryRequest`], [`PageOutput`]
//! - Errors: [`StoreError`]
//!
//! ```text
//! ┌──────────────────────────────┐
//! │          tablewright         │
//! │ (reconciler, paginated Table)│
//! └──────────────┬───────────────┘
//!                │ StoreClient
//! ┌──────────────┴───────────────┐
//! │  SDK adapter  │  test store  │
//! └──────────────────────────────┘
//! ```

mod client;
mod description;
mod error;
mod request;

pub use client::StoreClient;
pub use description::{GlobalIndexDescription, TableDescription};
pub use error::StoreError;
pub use request::{
    CreateTableRequest, GlobalIndexUpdate, PageOutput, QueryRequest, ScanRequest, Select,
    TableUpdate, UpdateTableRequest,
};
