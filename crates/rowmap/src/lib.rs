//! rowmap: entity-to-SQL statement synthesis.
//!
//! Declare your tables as plain structs with static metadata, pick a
//! dialect, and rowmap writes the SQL: inserts that surface generated
//! keys, relationship-aware CREATE TABLE (junction tables included),
//! paged queries, and transactional batches with affected-row
//! verification. Execution goes through the [`SqlExecutor`] trait, so
//! any driver can sit underneath.
//!
//! The [`Repository`] ties it together for the common cases:
//!
//! ```ignore
//! let mut repo = Repository::new(&mut exec, &Oracle);
//! repo.create_table::<User>()?;
//! let key = repo.insert(&user)?;
//! let loaded: Option<User> = repo.get(key)?;
//! ```

pub use rowmap_core::{
    ColumnInfo, Entity, Error, ExtractOptions, FromValue, JunctionTable, LinkTableInfo,
    NameRewriter, Params, Property, PropertyInfo, RelationInfo, RelationKind, Result, Row,
    ScalarType, SqlExecutor, TypeMap, Value, classify, extract_properties, foreign_key_lookups,
    junction_for, normalize_identifier, primary_key_field, slugify,
};
pub use rowmap_query::{
    CreateTableBuilder, DeleteBuilder, Dialect, GeneratedKeyClause, InsertBuilder,
    InsertPlan, Oracle, Postgres, SqlServer, Statement, UpdateBuilder, build_count_query,
    build_paginated_query, build_search, build_select, execute_batch, execute_insert_plan,
    execute_statement, include_collections, include_foreign_keys, sync_links,
};

pub mod repository;

pub use repository::Repository;
