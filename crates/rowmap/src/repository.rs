//! A convenience facade over the builders and the executor.
//!
//! The repository holds an executor and a dialect and wires the
//! statement builders to execution for the common cases: get, select,
//! insert, update, delete, schema creation, paging, and membership
//! synchronization. Anything beyond that drops down to the builders
//! directly.

use rowmap_core::{
    Entity, NameRewriter, Result, SqlExecutor, Value, primary_key_field,
};
use rowmap_query::{
    CreateTableBuilder, DeleteBuilder, Dialect, InsertBuilder, UpdateBuilder,
    build_count_query, build_paginated_query, build_select, execute_batch,
    execute_insert_plan, include_collections, include_foreign_keys, sync_links,
};
use tracing::debug;

/// Executor plus dialect, bound together for one unit of work.
pub struct Repository<'e> {
    exec: &'e mut dyn SqlExecutor,
    dialect: &'e dyn Dialect,
    rewriter: NameRewriter,
}

impl<'e> Repository<'e> {
    /// Bind an executor to a dialect.
    pub fn new(exec: &'e mut dyn SqlExecutor, dialect: &'e dyn Dialect) -> Self {
        Self {
            exec,
            dialect,
            rewriter: NameRewriter::new(),
        }
    }

    /// Apply find/replace pairs to derived junction table names.
    #[must_use]
    pub fn rewriter(mut self, rewriter: NameRewriter) -> Self {
        self.rewriter = rewriter;
        self
    }

    /// Load one row by primary key.
    pub fn get<E: Entity>(&mut self, key: Value) -> Result<Option<E>> {
        let pk = primary_key_field::<E>()?;
        let column = self.dialect.fit_identifier(pk.column_name);
        let sql = format!(
            "SELECT * FROM {} WHERE {} = {}",
            self.dialect.fit_identifier(E::TABLE_NAME),
            column,
            self.dialect.placeholder(column, 0),
        );
        let row = self.exec.query_one(&sql, &[(column.to_string(), key)])?;
        row.map(|r| E::from_row(&r)).transpose()
    }

    /// Load all rows matching an optional raw filter.
    pub fn select<E: Entity>(&mut self, filter: Option<&str>) -> Result<Vec<E>> {
        let stmt = build_select::<E>(self.dialect, filter, None)?;
        let rows = self.exec.query(stmt.sql(), stmt.params())?;
        rows.iter().map(E::from_row).collect()
    }

    /// Load one page of rows.
    pub fn select_page<E: Entity>(
        &mut self,
        page_size: i64,
        page_index: i64,
        filter: Option<&str>,
        sort_column: Option<&str>,
        sort_ascending: bool,
    ) -> Result<Vec<E>> {
        let base = format!(
            "SELECT * FROM {}",
            self.dialect.fit_identifier(E::TABLE_NAME)
        );
        let stmt = build_paginated_query(
            self.dialect,
            &base,
            page_size,
            page_index,
            filter,
            sort_column,
            sort_ascending,
        )?;
        let rows = self.exec.query(stmt.sql(), stmt.params())?;
        rows.iter().map(E::from_row).collect()
    }

    /// Count rows matching an optional raw filter.
    pub fn count<E: Entity>(&mut self, filter: Option<&str>) -> Result<i64> {
        let base = format!(
            "SELECT * FROM {}",
            self.dialect.fit_identifier(E::TABLE_NAME)
        );
        let stmt = build_count_query(&base, filter)?;
        let value = self.exec.query_scalar(stmt.sql(), stmt.params())?;
        Ok(value.and_then(|v| v.as_i64()).unwrap_or(0))
    }

    /// Insert a row (link-table rows included) and return its key.
    ///
    /// For generated keys the returned value is the database-assigned
    /// key; the caller assigns it back onto the entity.
    pub fn insert<E: Entity>(&mut self, entity: &E) -> Result<Value> {
        let plan = InsertBuilder::new(entity)
            .rewriter(self.rewriter.clone())
            .build(self.dialect)?;
        execute_insert_plan(self.exec, plan)
    }

    /// Update a row, verifying exactly one row changed.
    pub fn update<E: Entity>(&mut self, entity: &E) -> Result<u64> {
        let stmt = UpdateBuilder::new(entity).build(self.dialect)?;
        execute_batch(self.exec, &[stmt], Some(1))
    }

    /// Delete a row, verifying exactly one row changed.
    pub fn delete<E: Entity>(&mut self, entity: &E) -> Result<u64> {
        let stmt = DeleteBuilder::new(entity).build(self.dialect)?;
        execute_batch(self.exec, &[stmt], Some(1))
    }

    /// Reconcile an entity's junction memberships with the database.
    pub fn sync_links<E: Entity>(&mut self, entity: &E) -> Result<u64> {
        let statements = sync_links(self.exec, entity, self.dialect, &self.rewriter)?;
        execute_batch(self.exec, &statements, None)
    }

    /// Update a row and reconcile its junction memberships in one
    /// transaction.
    ///
    /// The UPDATE and every link/unlink statement run in a single batch,
    /// so a failed reconciliation rolls the scalar update back with it.
    /// Each statement must change exactly one row.
    pub fn update_with_links<E: Entity>(&mut self, entity: &E) -> Result<u64> {
        let mut statements = vec![UpdateBuilder::new(entity).build(self.dialect)?];
        statements.extend(sync_links(self.exec, entity, self.dialect, &self.rewriter)?);
        let expected = statements.len() as u64;
        execute_batch(self.exec, &statements, Some(expected))
    }

    /// Create the entity's table and its junction tables, skipping any
    /// that already exist.
    pub fn create_table<E: Entity>(&mut self) -> Result<()> {
        let ddl = CreateTableBuilder::<E>::new()
            .rewriter(self.rewriter.clone())
            .build(self.dialect)?;
        for stmt in ddl {
            let table = table_of(stmt.sql());
            if let Some(table) = table {
                if self.exec.table_exists(table)? {
                    debug!(table, "table already exists, skipping");
                    continue;
                }
            }
            self.exec.execute(stmt.sql(), stmt.params())?;
        }
        Ok(())
    }

    /// Resolve all navigations of an entity: referenced rows first, then
    /// collections.
    pub fn resolve<E: Entity>(&mut self, entity: &mut E) -> Result<()> {
        include_foreign_keys(self.exec, entity, self.dialect, None)?;
        include_collections(self.exec, entity, self.dialect, &self.rewriter, None)
    }
}

fn table_of(create_sql: &str) -> Option<&str> {
    create_sql
        .strip_prefix("CREATE TABLE ")?
        .split_whitespace()
        .next()
}
