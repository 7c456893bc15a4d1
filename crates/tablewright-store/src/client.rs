//! Store client trait.
//!
//! The [`StoreClient`] trait is the only seam between tablewright and the
//! remote key-value store. It enables:
//! - Adapters over a real store SDK or HTTP endpoint
//! - In-memory stores for testing the reconciler and pagination
//!
//! All methods are synchronous: each call is one request/response round
//! trip, and the reconciler's convergence waits are plain blocking polls.

use std::sync::Arc;

use tablewright_types::Item;

use crate::{
    CreateTableRequest, PageOutput, QueryRequest, ScanRequest, StoreError, TableDescription,
    UpdateTableRequest,
};

/// Abstraction over the remote store.
pub trait StoreClient: Send + Sync {
    /// Describes a table. Fails with [`StoreError::TableNotFound`] if absent.
    fn describe_table(&self, table_name: &str) -> Result<TableDescription, StoreError>;

    /// Starts creating a table. The returned description is typically `CREATING`.
    fn create_table(&self, request: CreateTableRequest) -> Result<TableDescription, StoreError>;

    /// Starts one structural change on an existing table.
    fn update_table(&self, request: UpdateTableRequest) -> Result<TableDescription, StoreError>;

    /// Reads one page of a table or index.
    fn scan(&self, request: &ScanRequest) -> Result<PageOutput, StoreError>;

    /// Reads one page of items matching a key condition.
    fn query(&self, request: &QueryRequest) -> Result<PageOutput, StoreError>;

    /// Writes an item, replacing any item with the same key.
    fn put_item(&self, table_name: &str, item: Item) -> Result<(), StoreError>;

    /// Reads the item with the given key.
    fn get_item(&self, table_name: &str, key: &Item) -> Result<Option<Item>, StoreError>;

    /// Deletes the item with the given key, returning its old attributes.
    fn delete_item(&self, table_name: &str, key: &Item) -> Result<Option<Item>, StoreError>;

    /// Sets every attribute of `updates` on the keyed item, returning the new item.
    fn update_item(&self, table_name: &str, key: &Item, updates: Item)
    -> Result<Item, StoreError>;
}

impl<T: StoreClient + ?Sized> StoreClient for Arc<T> {
    fn describe_table(&self, table_name: &str) -> Result<TableDescription, StoreError> {
        (**self).describe_table(table_name)
    }

    fn create_table(&self, request: CreateTableRequest) -> Result<TableDescription, StoreError> {
        (**self).create_table(request)
    }

    fn update_table(&self, request: UpdateTableRequest) -> Result<TableDescription, StoreError> {
        (**self).update_table(request)
    }

    fn scan(&self, request: &ScanRequest) -> Result<PageOutput, StoreError> {
        (**self).scan(request)
    }

    fn query(&self, request: &QueryRequest) -> Result<PageOutput, StoreError> {
        (**self).query(request)
    }

    fn put_item(&self, table_name: &str, item: Item) -> Result<(), StoreError> {
        (**self).put_item(table_name, item)
    }

    fn get_item(&self, table_name: &str, key: &Item) -> Result<Option<Item>, StoreError> {
        (**self).get_item(table_name, key)
    }

    fn delete_item(&self, table_name: &str, key: &Item) -> Result<Option<Item>, StoreError> {
        (**self).delete_item(table_name, key)
    }

    fn update_item(
        &self,
        table_name: &str,
        key: &Item,
        updates: Item,
    ) -> Result<Item, StoreError> {
        (**self).update_item(table_name, key, updates)
    }
}

impl<T: StoreClient + ?Sized> StoreClient for &T {
    fn describe_table(&self, table_name: &str) -> Result<TableDescription, StoreError> {
        (**self).describe_table(table_name)
    }

    fn create_table(&self, request: CreateTableRequest) -> Result<TableDescription, StoreError> {
        (**self).create_table(request)
    }

    fn update_table(&self, request: UpdateTableRequest) -> Result<TableDescription, StoreError> {
        (**self).update_table(request)
    }

    fn scan(&self, request: &ScanRequest) -> Result<PageOutput, StoreError> {
        (**self).scan(request)
    }

    fn query(&self, request: &QueryRequest) -> Result<PageOutput, StoreError> {
        (**self).query(request)
    }

    fn put_item(&self, table_name: &str, item: Item) -> Result<(), StoreError> {
        (**self).put_item(table_name, item)
    }

    fn get_item(&self, table_name: &str, key: &Item) -> Result<Option<Item>, StoreError> {
        (**self).get_item(table_name, key)
    }

    fn delete_item(&self, table_name: &str, key: &Item) -> Result<Option<Item>, StoreError> {
        (**self).delete_item(table_name, key)
    }

    fn update_item(
        &self,
        table_name: &str,
        key: &Item,
        updates: Item,
    ) -> Result<Item, StoreError> {
        (**self).update_item(table_name, key, updates)
    }
}
