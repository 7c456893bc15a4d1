//! Store error types.

/// Errors reported by a [`StoreClient`](crate::StoreClient).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The table does not exist (yet, or any more).
    #[error("table not found: {table}")]
    TableNotFound { table: String },

    /// The store rejected the request.
    #[error("store rejected request ({code}): {message}")]
    Service { code: String, message: String },

    /// The request never reached the store, or its response was unreadable.
    #[error("transport error: {0}")]
    Transport(String),
}

impl StoreError {
    /// True for the store's "resource not found" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound { .. })
    }
}
