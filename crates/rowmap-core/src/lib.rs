//! Core types and traits for rowmap.
//!
//! This crate provides the foundational abstractions for entity-to-SQL
//! statement synthesis:
//!
//! - `Entity` trait for declaring table-mapped types
//! - `PropertyInfo`/`Property` metadata descriptors
//! - relationship metadata and the one-to-many/many-to-many classifier
//! - identifier normalization rules
//! - the `SqlExecutor` boundary toward concrete drivers

pub mod entity;
pub mod error;
pub mod executor;
pub mod extract;
pub mod identifiers;
pub mod property;
pub mod relation;
pub mod row;
pub mod types;
pub mod value;

pub use entity::{Entity, primary_key_field, primary_key_of};
pub use error::{Error, Result};
pub use executor::{Params, SqlExecutor};
pub use extract::{ExtractOptions, RelatedLookup, extract_properties, foreign_key_lookups};
pub use identifiers::{normalize_identifier, slugify};
pub use property::{Property, PropertyInfo};
pub use relation::{
    JunctionTable, LinkTableInfo, MAX_IDENTIFIER_LEN, RelationInfo, RelationKind, classify,
    find_relation, junction_for, junction_key_column, junction_table_name,
};
pub use row::{ColumnInfo, FromValue, Row};
pub use types::{NameRewriter, ScalarType, TypeMap};
pub use value::Value;
