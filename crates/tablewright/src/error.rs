//! Error types for tablewright.

use thiserror::Error;

use tablewright_schema::ConfigError;
use tablewright_store::StoreError;

use crate::codec::CodecError;
use crate::cursor::TokenError;
use crate::expression::ExpressionError;
use crate::reconcile::ReconcileError;

/// Errors from any tablewright operation.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid schema tags.
    #[error("schema error: {0}")]
    Config(#[from] ConfigError),

    /// Store request failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Schema reconciliation failed.
    #[error("reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Malformed continuation token.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Malformed query expression.
    #[error("expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// Record conversion failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// An item lacks one of the table's key attributes.
    #[error("item is missing key attribute '{attribute}'")]
    MissingKeyAttribute { attribute: String },

    /// The named index is not part of the table's schema.
    #[error("table {table} has no index named '{index}'")]
    UnknownIndex { table: String, index: String },

    /// Page size of zero.
    #[error("page size must be at least 1")]
    InvalidPageSize,
}

/// Result type for tablewright operations.
pub type Result<T> = std::result::Result<T, Error>;
