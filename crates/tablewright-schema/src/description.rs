//! Type descriptions: the explicit registration surface for record types.
//!
//! A [`TypeDescription`] enumerates a record's fields together with their
//! declared types and the raw schema tags attached to them. Descriptions are
//! built with the builder methods below or deserialized from TOML/JSON.

use serde::{Deserialize, Serialize};
use tablewright_types::ScalarType;

/// A record type: a name plus its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescription {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field. Declaration order is preserved.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Number,
    Bool,
    Binary,
    Uuid,
    Timestamp,
    /// Lists, maps and anything else the store keeps as a document value.
    Document,
    /// A nested record, walked recursively.
    Composite(TypeDescription),
}

impl FieldKind {
    /// Storage scalar type implied by the declared kind alone.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Self::String => Some(ScalarType::String),
            Self::Number | Self::Bool => Some(ScalarType::Number),
            Self::Binary | Self::Uuid => Some(ScalarType::Binary),
            Self::Timestamp | Self::Document | Self::Composite(_) => None,
        }
    }
}

/// One field of a [`TypeDescription`].
///
/// The tag strings are kept raw here; they are parsed by the tag grammar
/// during derivation so that errors can name the qualified field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Nested value may be absent. Walked exactly like a required composite.
    #[serde(default)]
    pub optional: bool,
    /// Excludes the field, and everything beneath it, from the schema.
    #[serde(default)]
    pub skip: bool,
    /// Primary key tag: `role[,readCap,writeCap]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Global index tag: `name,role[,readCap,writeCap,projection]` specs joined by `;`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_index: Option<String>,
    /// Local index tag: `name,role[,projection]` specs joined by `;`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_index: Option<String>,
    /// Value codec tag: `alias[,option...]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
            skip: false,
            key: None,
            global_index: None,
            local_index: None,
            codec: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Binary)
    }

    pub fn composite(name: impl Into<String>, nested: TypeDescription) -> Self {
        Self::new(name, FieldKind::Composite(nested))
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    pub fn key(mut self, tag: impl Into<String>) -> Self {
        self.key = Some(tag.into());
        self
    }

    pub fn global_index(mut self, tag: impl Into<String>) -> Self {
        self.global_index = Some(tag.into());
        self
    }

    pub fn local_index(mut self, tag: impl Into<String>) -> Self {
        self.local_index = Some(tag.into());
        self
    }

    pub fn codec(mut self, tag: impl Into<String>) -> Self {
        self.codec = Some(tag.into());
        self
    }

    /// True when the field carries any key or index tag.
    pub fn has_schema_tags(&self) -> bool {
        self.key.is_some() || self.global_index.is_some() || self.local_index.is_some()
    }
}

/// Parsed value codec tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodecTag {
    /// Exposed name, if the tag renames the field.
    pub alias: Option<String>,
    /// The field is omitted from the schema (`-`).
    pub omitted: bool,
    /// Scalar type forced by a `string` or `unixtime` option.
    pub scalar_override: Option<ScalarType>,
}

impl CodecTag {
    /// Parses `alias[,option...]`. Unknown options are ignored, as the codec
    /// itself owns their meaning.
    pub fn parse(tag: &str) -> Self {
        let mut parts = tag.split(',');
        let alias = parts.next().unwrap_or_default().trim();

        let mut parsed = Self::default();
        match alias {
            "" => {}
            "-" => parsed.omitted = true,
            other => parsed.alias = Some(other.to_string()),
        }

        for option in parts {
            match option.trim() {
                "string" => parsed.scalar_override = Some(ScalarType::String),
                "unixtime" => parsed.scalar_override = Some(ScalarType::Number),
                _ => {}
            }
        }
        parsed
    }
}
