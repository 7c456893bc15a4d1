//! Paging request and result types.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tablewright_types::{AttributeValue, Item};

use crate::codec::{CodecError, ValueCodec};

/// Which page to read.
///
/// Without a token the first `offset * size` results are skipped. With a
/// token, reading resumes right after the item the token was issued for and
/// `offset` is only echoed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub size: u64,
    pub token: Option<String>,
}

impl PageRequest {
    pub fn new(offset: u64, size: u64) -> Self {
        Self {
            offset,
            size,
            token: None,
        }
    }

    /// The first page of `size` results.
    pub fn first(size: u64) -> Self {
        Self::new(0, size)
    }

    /// Resumes after `token`.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub offset: u64,
    pub size: u64,
    /// Number of results across all pages.
    pub total: u64,
    /// Continuation token, set when the page filled up and more results may follow.
    pub last_item_token: Option<String>,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub(crate) fn empty(request: &PageRequest, total: u64) -> Self {
        Self {
            offset: request.offset,
            size: request.size,
            total,
            last_item_token: None,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when a continuation token was issued.
    pub fn has_more(&self) -> bool {
        self.last_item_token.is_some()
    }
}

impl Page<Item> {
    /// Decodes every item into a record.
    pub fn decode<T: DeserializeOwned>(self, codec: &impl ValueCodec) -> Result<Page<T>, CodecError> {
        let items = self
            .items
            .iter()
            .map(|item| codec.from_item(item))
            .collect::<Result<Vec<T>, _>>()?;
        Ok(Page {
            offset: self.offset,
            size: self.size,
            total: self.total,
            last_item_token: self.last_item_token,
            items,
        })
    }
}

/// A key-condition query against the table or one of its indexes.
///
/// Field names in `{braces}` are replaced by placeholders; the key condition
/// and the filter share one placeholder map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub index: Option<String>,
    pub key_condition: String,
    pub filter: Option<String>,
    /// Values for the `:name` placeholders of both expressions.
    pub values: Item,
}

impl Query {
    pub fn new(key_condition: impl Into<String>) -> Self {
        Self {
            key_condition: key_condition.into(),
            ..Self::default()
        }
    }

    pub fn on_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn value(mut self, placeholder: impl Into<String>, value: AttributeValue) -> Self {
        self.values.insert(placeholder.into(), value);
        self
    }
}
