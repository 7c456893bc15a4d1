//! Table handle: item operations and offset/cursor pagination.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tablewright_schema::DesiredSchema;
use tablewright_store::{PageOutput, QueryRequest, ScanRequest, Select, StoreClient, StoreError};
use tablewright_types::Item;

use crate::codec::{JsonCodec, ValueCodec};
use crate::cursor::{decode_cursor, encode_cursor};
use crate::error::{Error, Result};
use crate::expression::ExpressionNames;
use crate::page::{Page, PageRequest, Query};
use crate::reconcile::{ReconcileReport, Reconciler, ReconcilerConfig};

/// A table bound to its desired schema.
#[derive(Debug)]
pub struct Table<S, C = JsonCodec> {
    store: S,
    codec: C,
    schema: DesiredSchema,
}

impl<S: StoreClient> Table<S> {
    pub fn new(store: S, schema: DesiredSchema) -> Self {
        Self::with_codec(store, schema, JsonCodec)
    }
}

impl<S: StoreClient, C: ValueCodec> Table<S, C> {
    pub fn with_codec(store: S, schema: DesiredSchema, codec: C) -> Self {
        Self {
            store,
            codec,
            schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.schema.table_name
    }

    pub fn schema(&self) -> &DesiredSchema {
        &self.schema
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Creates the table or converges its schema.
    pub fn ensure(&self, config: &ReconcilerConfig) -> Result<ReconcileReport> {
        let reconciler = Reconciler::new(&self.store, *config);
        Ok(reconciler.reconcile(&self.schema)?)
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// Projects `item` onto the table's key attributes.
    pub fn key_of(&self, item: &Item) -> Result<Item> {
        self.schema
            .key_attribute_names()
            .into_iter()
            .map(|name| {
                item.get(name)
                    .map(|value| (name.to_string(), value.clone()))
                    .ok_or_else(|| Error::MissingKeyAttribute {
                        attribute: name.to_string(),
                    })
            })
            .collect()
    }

    pub fn put_item(&self, item: Item) -> Result<()> {
        self.key_of(&item)?;
        self.store.put_item(self.name(), item)?;
        Ok(())
    }

    /// Reads the item whose key attributes match those of `key`.
    pub fn get_item(&self, key: &Item) -> Result<Option<Item>> {
        let key = self.key_of(key)?;
        Ok(self.store.get_item(self.name(), &key)?)
    }

    /// Deletes the keyed item, returning its old attributes.
    pub fn delete_item(&self, key: &Item) -> Result<Option<Item>> {
        let key = self.key_of(key)?;
        Ok(self.store.delete_item(self.name(), &key)?)
    }

    /// Sets every non-key attribute of `item` on the stored item with the
    /// same key, returning the updated item.
    pub fn update_item(&self, mut item: Item) -> Result<Item> {
        let key = self.key_of(&item)?;
        for name in key.keys() {
            item.remove(name);
        }
        Ok(self.store.update_item(self.name(), &key, item)?)
    }

    pub fn put<T: Serialize>(&self, record: &T) -> Result<()> {
        let item = self.codec.to_item(record)?;
        self.put_item(item)
    }

    /// Reads a record by key. `key` may be the full record or any value
    /// carrying the key fields.
    pub fn get<T: DeserializeOwned, K: Serialize>(&self, key: &K) -> Result<Option<T>> {
        let key = self.codec.to_item(key)?;
        self.get_item(&key)?
            .map(|item| self.codec.from_item(&item))
            .transpose()
            .map_err(Error::from)
    }

    pub fn delete<T: DeserializeOwned, K: Serialize>(&self, key: &K) -> Result<Option<T>> {
        let key = self.codec.to_item(key)?;
        self.delete_item(&key)?
            .map(|item| self.codec.from_item(&item))
            .transpose()
            .map_err(Error::from)
    }

    pub fn update<T: Serialize + DeserializeOwned>(&self, record: &T) -> Result<T> {
        let item = self.codec.to_item(record)?;
        let updated = self.update_item(item)?;
        Ok(self.codec.from_item(&updated)?)
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Reads one page of a scan over the table or one of its indexes.
    pub fn scan_page(&self, index: Option<&str>, request: &PageRequest) -> Result<Page<Item>> {
        let base = ScanRequest {
            table_name: self.schema.table_name.clone(),
            index_name: index.map(str::to_string),
            ..ScanRequest::default()
        };
        self.paginate(index, request, |select, limit, start| {
            self.store.scan(&ScanRequest {
                select,
                limit,
                exclusive_start_key: start,
                ..base.clone()
            })
        })
    }

    /// Reads one page of a query.
    pub fn query_page(&self, query: &Query, request: &PageRequest) -> Result<Page<Item>> {
        let mut names = ExpressionNames::new();
        let key_condition_expression = names.rewrite(&query.key_condition)?;
        let filter_expression = query
            .filter
            .as_deref()
            .map(|filter| names.rewrite(filter))
            .transpose()?;

        let base = QueryRequest {
            table_name: self.schema.table_name.clone(),
            index_name: query.index.clone(),
            key_condition_expression,
            filter_expression,
            expression_attribute_names: names.into_map(),
            expression_attribute_values: query.values.clone(),
            ..QueryRequest::default()
        };
        self.paginate(query.index.as_deref(), request, |select, limit, start| {
            self.store.query(&QueryRequest {
                select,
                limit,
                exclusive_start_key: start,
                ..base.clone()
            })
        })
    }

    /// Typed variant of [`scan_page`](Self::scan_page).
    pub fn scan_records<T: DeserializeOwned>(
        &self,
        index: Option<&str>,
        request: &PageRequest,
    ) -> Result<Page<T>> {
        Ok(self.scan_page(index, request)?.decode(&self.codec)?)
    }

    /// Typed variant of [`query_page`](Self::query_page).
    pub fn query_records<T: DeserializeOwned>(
        &self,
        query: &Query,
        request: &PageRequest,
    ) -> Result<Page<T>> {
        Ok(self.query_page(query, request)?.decode(&self.codec)?)
    }

    /// Shared paging loop over a scan or query.
    ///
    /// Counts every result first, then skips `offset * size` results (or
    /// resumes after the token) and collects up to `size` items.
    fn paginate(
        &self,
        index: Option<&str>,
        request: &PageRequest,
        fetch: impl Fn(Select, Option<u64>, Option<Item>) -> std::result::Result<PageOutput, StoreError>,
    ) -> Result<Page<Item>> {
        if request.size == 0 {
            return Err(Error::InvalidPageSize);
        }
        let cursor_attributes = self.cursor_attributes(index)?;

        let mut total: u64 = 0;
        let mut start: Option<Item> = None;
        loop {
            let counted = fetch(Select::Count, None, start.take())?;
            total += counted.count;
            match counted.last_evaluated_key {
                Some(key) => start = Some(key),
                None => break,
            }
        }

        let (mut start, skip) = match request.token.as_deref() {
            Some(token) => (Some(decode_cursor(token)?), 0),
            None => (None, request.offset.saturating_mul(request.size)),
        };

        let mut page = Page::empty(request, total);
        if skip >= total {
            tracing::debug!(table = %self.name(), index, skip, total, "page lies beyond the last result");
            return Ok(page);
        }

        let capacity = usize::try_from(request.size).unwrap_or(usize::MAX).min(1024);
        page.items.reserve(capacity);

        let mut seen: u64 = 0;
        let mut requests: u64 = 0;
        'pages: loop {
            let output = fetch(Select::AllAttributes, Some(request.size), start.take())?;
            requests += 1;
            let returned = output.items.len();

            for (position, item) in output.items.into_iter().enumerate() {
                if seen < skip {
                    seen += 1;
                    continue;
                }
                seen += 1;

                let provably_last =
                    position + 1 == returned && output.last_evaluated_key.is_none();
                let full = page.items.len() as u64 + 1 >= request.size;
                if full && !provably_last {
                    page.last_item_token = Some(encode_cursor(&cursor_key(
                        &item,
                        &cursor_attributes,
                    ))?);
                }
                page.items.push(item);
                if full {
                    break 'pages;
                }
            }

            match output.last_evaluated_key {
                Some(key) => start = Some(key),
                None => break,
            }
        }

        tracing::debug!(
            table = %self.name(),
            index,
            offset = request.offset,
            size = request.size,
            total,
            returned = page.items.len(),
            requests,
            more = page.last_item_token.is_some(),
            "read page"
        );
        Ok(page)
    }

    /// Attributes making up a cursor: the table key plus the index key.
    fn cursor_attributes(&self, index: Option<&str>) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .schema
            .key_attribute_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        if let Some(index) = index {
            let index_names = self.schema.index_key_attribute_names(index).ok_or_else(|| {
                Error::UnknownIndex {
                    table: self.schema.table_name.clone(),
                    index: index.to_string(),
                }
            })?;
            for name in index_names {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }
}

fn cursor_key(item: &Item, attributes: &[String]) -> Item {
    attributes
        .iter()
        .filter_map(|name| item.get(name).map(|value| (name.clone(), value.clone())))
        .collect()
}
