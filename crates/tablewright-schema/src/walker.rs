//! Field metadata walker.
//!
//! Flattens a [`TypeDescription`] into [`FieldSpec`]s: one per field, with
//! nested composites expanded depth-first in declaration order and their
//! children qualified by the dot-joined exposed names of every ancestor.

use tablewright_types::ScalarType;

use crate::description::{CodecTag, FieldDescriptor, FieldKind, TypeDescription};

/// Separator between ancestor names in a qualified field name.
pub const PATH_SEPARATOR: char = '.';

/// Raw schema tags of a walked field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTags {
    pub key: Option<String>,
    pub global_index: Option<String>,
    pub local_index: Option<String>,
}

/// A flattened field: qualified name, scalar type and raw tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub qualified_name: String,
    /// `None` when the field cannot be stored as a scalar.
    pub scalar_type: Option<ScalarType>,
    pub tags: FieldTags,
}

/// Walks a type description from the root.
pub fn walk(description: &TypeDescription) -> Vec<FieldSpec> {
    walk_with_prefix(description, "")
}

/// Walks a type description, prefixing every qualified name with `prefix`.
///
/// A non-empty prefix must already end with [`PATH_SEPARATOR`].
pub fn walk_with_prefix(description: &TypeDescription, prefix: &str) -> Vec<FieldSpec> {
    let mut specs = Vec::with_capacity(description.fields.len());
    visit(&description.fields, prefix, &mut specs);
    specs
}

fn visit(fields: &[FieldDescriptor], prefix: &str, specs: &mut Vec<FieldSpec>) {
    for field in fields {
        if field.skip {
            continue;
        }

        let codec = field.codec.as_deref().map(CodecTag::parse).unwrap_or_default();
        if codec.omitted {
            continue;
        }

        let exposed = codec.alias.as_deref().unwrap_or(&field.name);
        let qualified_name = format!("{prefix}{exposed}");
        let tags = FieldTags {
            key: field.key.clone(),
            global_index: field.global_index.clone(),
            local_index: field.local_index.clone(),
        };

        match &field.kind {
            FieldKind::Composite(nested) => {
                // Only surfaced so that a key reference to it can be rejected.
                if field.has_schema_tags() {
                    specs.push(FieldSpec {
                        qualified_name: qualified_name.clone(),
                        scalar_type: None,
                        tags,
                    });
                }
                let child_prefix = format!("{qualified_name}{PATH_SEPARATOR}");
                visit(&nested.fields, &child_prefix, specs);
            }
            kind => specs.push(FieldSpec {
                qualified_name,
                scalar_type: codec.scalar_override.or_else(|| kind.scalar_type()),
                tags,
            }),
        }
    }
}
