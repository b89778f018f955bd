//! SQL statement synthesis for rowmap.
//!
//! This crate turns entity metadata into executable statements for one
//! of several dialects:
//!
//! - DML builders for INSERT/UPDATE/DELETE/SELECT
//! - CREATE TABLE synthesis, junction tables included
//! - paged and counted query wrapping
//! - junction membership maintenance and synchronization
//! - inclusion resolution for navigations
//! - transactional batch execution with affected-row verification

pub mod batch;
pub mod builder;
pub mod ddl;
pub mod dialect;
pub mod include;
pub mod links;
pub mod paging;
pub mod statement;

pub use batch::{execute_batch, execute_insert_plan, execute_statement};
pub use builder::{DeleteBuilder, InsertBuilder, UpdateBuilder, build_search, build_select};
pub use ddl::CreateTableBuilder;
pub use dialect::{
    Dialect, GeneratedKeyClause, Oracle, Postgres, SqlServer, resolve_column_type,
};
pub use include::{include_collections, include_foreign_keys};
pub use links::{link_statement, stored_memberships, sync_links, unlink_statement};
pub use paging::{build_count_query, build_paginated_query};
pub use statement::{InsertPlan, OWNER_KEY_HOLE, Statement};

/// Build an insert plan for an entity instance.
///
/// `insert!(&hero, &dialect)` expands to the default builder; an extra
/// `table:` argument overrides the target table.
#[macro_export]
macro_rules! insert {
    ($entity:expr, $dialect:expr) => {
        $crate::InsertBuilder::new($entity).build($dialect)
    };
    ($entity:expr, $dialect:expr, table: $table:expr) => {
        $crate::InsertBuilder::new($entity).table($table).build($dialect)
    };
}

/// Build an update statement for an entity instance.
#[macro_export]
macro_rules! update {
    ($entity:expr, $dialect:expr) => {
        $crate::UpdateBuilder::new($entity).build($dialect)
    };
    ($entity:expr, $dialect:expr, table: $table:expr) => {
        $crate::UpdateBuilder::new($entity).table($table).build($dialect)
    };
}

/// Build a delete statement for an entity instance.
#[macro_export]
macro_rules! delete {
    ($entity:expr, $dialect:expr) => {
        $crate::DeleteBuilder::new($entity).build($dialect)
    };
}

/// Build a get-by-key select for an entity instance.
#[macro_export]
macro_rules! search {
    ($entity:expr, $dialect:expr) => {
        $crate::build_search($dialect, $entity, None)
    };
    ($entity:expr, $dialect:expr, key: $key:expr) => {
        $crate::build_search($dialect, $entity, Some($key))
    };
}

/// Build a filtered select for an entity type.
#[macro_export]
macro_rules! select {
    ($entity:ty, $dialect:expr) => {
        $crate::build_select::<$entity>($dialect, None, None)
    };
    ($entity:ty, $dialect:expr, where: $filter:expr) => {
        $crate::build_select::<$entity>($dialect, Some($filter), None)
    };
}
