//! Semantic column types and dialect type mapping.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Semantic column types carried by property metadata.
///
/// These are database-neutral; a [`TypeMap`] turns them into the concrete
/// column type text of one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Boolean,
    Integer,
    BigInt,
    Double,
    Decimal,
    String,
    Binary,
    Date,
    Time,
    DateTime,
    Json,
}

impl ScalarType {
    /// The semantic name used as the type-map key.
    #[must_use]
    pub const fn semantic_name(&self) -> &'static str {
        match self {
            ScalarType::Boolean => "Boolean",
            ScalarType::Integer => "Integer",
            ScalarType::BigInt => "BigInt",
            ScalarType::Double => "Double",
            ScalarType::Decimal => "Decimal",
            ScalarType::String => "String",
            ScalarType::Binary => "Binary",
            ScalarType::Date => "Date",
            ScalarType::Time => "Time",
            ScalarType::DateTime => "DateTime",
            ScalarType::Json => "Json",
        }
    }

    /// Check if this type is text-based (length modifiers apply).
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, ScalarType::String)
    }
}

/// A mapping from semantic type names to one dialect's column type text.
///
/// Callers may supply their own map; dialects provide a default. Lookup
/// failure is a typed [`Error::UnsupportedType`].
#[derive(Debug, Clone)]
pub struct TypeMap {
    dialect: String,
    entries: HashMap<&'static str, String>,
}

impl TypeMap {
    /// Create an empty type map for the named dialect.
    #[must_use]
    pub fn new(dialect: impl Into<String>) -> Self {
        Self {
            dialect: dialect.into(),
            entries: HashMap::new(),
        }
    }

    /// The dialect this map belongs to.
    #[must_use]
    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    /// Insert or replace a mapping entry.
    pub fn insert(&mut self, semantic: &'static str, column_type: impl Into<String>) {
        self.entries.insert(semantic, column_type.into());
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, semantic: &'static str, column_type: impl Into<String>) -> Self {
        self.insert(semantic, column_type);
        self
    }

    /// Resolve a semantic type to the dialect's column type text.
    pub fn resolve(&self, scalar: ScalarType) -> Result<&str> {
        self.entries
            .get(scalar.semantic_name())
            .map(String::as_str)
            .ok_or_else(|| Error::unsupported_type(scalar.semantic_name(), self.dialect.clone()))
    }

    /// Resolve and apply a length modifier to a text type.
    ///
    /// The mapped base type has any existing parenthesized size replaced by
    /// the property's declared maximum length, so `NVARCHAR2(1000)` with a
    /// max length of 50 becomes `NVARCHAR2(50)`.
    pub fn resolve_sized(&self, scalar: ScalarType, max_length: Option<u32>) -> Result<String> {
        let base = self.resolve(scalar)?;
        match max_length {
            Some(len) if scalar.is_text() => {
                let stem = base.split('(').next().unwrap_or(base);
                Ok(format!("{}({})", stem, len))
            }
            _ => Ok(base.to_string()),
        }
    }
}

/// An ordered set of find/replace pairs applied to generated table names.
///
/// Used by environments that need prefix/suffix rewriting of every
/// generated identifier. Pairs apply in insertion order.
#[derive(Debug, Clone, Default)]
pub struct NameRewriter {
    pairs: Vec<(String, String)>,
}

impl NameRewriter {
    /// Create an empty rewriter (identity mapping).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a find/replace pair.
    #[must_use]
    pub fn replace(mut self, find: impl Into<String>, with: impl Into<String>) -> Self {
        self.pairs.push((find.into(), with.into()));
        self
    }

    /// Apply all pairs, in order, to a generated name.
    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        self.pairs
            .iter()
            .fold(name.to_string(), |acc, (find, with)| acc.replace(find, with))
    }

    /// Check whether any pairs are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle_ish_map() -> TypeMap {
        TypeMap::new("oracle")
            .with("String", "NVARCHAR2(1000)")
            .with("Integer", "NUMBER(10)")
            .with("Boolean", "NUMBER(1)")
    }

    #[test]
    fn test_resolve_hit() {
        let map = oracle_ish_map();
        assert_eq!(map.resolve(ScalarType::Integer).unwrap(), "NUMBER(10)");
    }

    #[test]
    fn test_resolve_miss_is_unsupported_type() {
        let map = oracle_ish_map();
        let err = map.resolve(ScalarType::DateTime).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
        assert!(err.to_string().contains("DateTime"));
        assert!(err.to_string().contains("oracle"));
    }

    #[test]
    fn test_resolve_sized_replaces_length() {
        let map = oracle_ish_map();
        let text = map
            .resolve_sized(ScalarType::String, Some(50))
            .unwrap();
        assert_eq!(text, "NVARCHAR2(50)");
    }

    #[test]
    fn test_resolve_sized_ignores_non_text() {
        let map = oracle_ish_map();
        let text = map
            .resolve_sized(ScalarType::Integer, Some(50))
            .unwrap();
        assert_eq!(text, "NUMBER(10)");
    }

    #[test]
    fn test_name_rewriter_ordered() {
        let rw = NameRewriter::new()
            .replace("USER", "APP_USER")
            .replace("APP_", "X_");
        assert_eq!(rw.apply("USERtoGROUP"), "X_USERtoGROUP");
    }

    #[test]
    fn test_name_rewriter_identity() {
        let rw = NameRewriter::new();
        assert!(rw.is_empty());
        assert_eq!(rw.apply("ORDERS"), "ORDERS");
    }
}
