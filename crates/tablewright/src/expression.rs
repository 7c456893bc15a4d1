//! Expression alias rewriting.
//!
//! Query expressions may wrap field names in braces (`{Name} = :name`) so that
//! names colliding with the store's reserved words still work. Each distinct
//! field is replaced by a generated placeholder (`#A`, `#B`, ...) recorded in
//! an [`ExpressionNames`] map. Sharing one map between the key condition and
//! the filter of a query makes the same field resolve to the same alias in
//! both.

use std::collections::BTreeMap;

/// Generated placeholders are `#` followed by one of these letters.
const ALIAS_LETTERS: std::ops::RangeInclusive<char> = 'A'..='Z';

/// Errors from rewriting an expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    /// A `{` with no closing `}`.
    #[error("unterminated field reference starting at byte {position}")]
    Unterminated { position: usize },

    /// `{}` with nothing inside.
    #[error("empty field reference at byte {position}")]
    EmptyReference { position: usize },

    /// Every single-letter placeholder is already assigned.
    #[error("no free placeholder left for field '{field}'")]
    AliasesExhausted { field: String },
}

/// Placeholder to field name mapping shared across the expressions of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionNames {
    names: BTreeMap<String, String>,
}

impl ExpressionNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a caller-chosen placeholder. Its letter is then never generated.
    pub fn insert(&mut self, alias: impl Into<String>, field: impl Into<String>) {
        self.names.insert(alias.into(), field.into());
    }

    /// The placeholder already assigned to `field`, if any.
    pub fn alias_for(&self, field: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, f)| f.as_str() == field)
            .map(|(alias, _)| alias.as_str())
    }

    pub fn field_for(&self, alias: &str) -> Option<&str> {
        self.names.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.names
    }

    /// Rewrites every `{field}` reference in `expression`.
    pub fn rewrite(&mut self, expression: &str) -> Result<String, ExpressionError> {
        let mut rewritten = String::with_capacity(expression.len());
        let mut rest = expression;
        let mut offset = 0;

        while let Some(open) = rest.find('{') {
            rewritten.push_str(&rest[..open]);
            let position = offset + open;
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or(ExpressionError::Unterminated { position })?;

            let field = after[..close].trim();
            if field.is_empty() {
                return Err(ExpressionError::EmptyReference { position });
            }
            rewritten.push_str(&self.alias_or_assign(field)?);

            let consumed = open + 1 + close + 1;
            rest = &rest[consumed..];
            offset += consumed;
        }
        rewritten.push_str(rest);
        Ok(rewritten)
    }

    fn alias_or_assign(&mut self, field: &str) -> Result<String, ExpressionError> {
        if let Some(alias) = self.alias_for(field) {
            return Ok(alias.to_string());
        }
        let alias = ALIAS_LETTERS
            .map(|letter| format!("#{letter}"))
            .find(|alias| !self.names.contains_key(alias))
            .ok_or_else(|| ExpressionError::AliasesExhausted {
                field: field.to_string(),
            })?;
        self.names.insert(alias.clone(), field.to_string());
        Ok(alias)
    }
}

/// Rewrites `expression` against a shared placeholder map.
pub fn rewrite_expression(
    expression: &str,
    names: &mut ExpressionNames,
) -> Result<String, ExpressionError> {
    names.rewrite(expression)
}
