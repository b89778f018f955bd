//! The execution boundary.
//!
//! rowmap never opens sockets or speaks wire protocols; everything that
//! touches a database goes through [`SqlExecutor`]. Implementations wrap
//! a concrete driver, translate its native "no such table" condition into
//! [`Error::TableMissing`](crate::Error), and propagate every other
//! driver error unchanged. The core calls the trait strictly in the
//! sequence: begin (for multi-statement work) → execute N → commit or
//! rollback.

use crate::Result;
use crate::row::Row;
use crate::value::Value;

/// Named parameters bound to one statement, in declaration order.
pub type Params = [(String, Value)];

/// A synchronous SQL execution capability.
///
/// The trait is object-safe so resolvers and batch helpers can take
/// `&mut dyn SqlExecutor`. Cancellation and timeouts are the
/// implementation's concern; the core never blocks on anything else.
pub trait SqlExecutor {
    /// Execute a query and return all rows.
    fn query(&mut self, sql: &str, params: &Params) -> Result<Vec<Row>>;

    /// Execute a statement (INSERT, UPDATE, DELETE, DDL) and return the
    /// number of affected rows.
    fn execute(&mut self, sql: &str, params: &Params) -> Result<u64>;

    /// Execute an INSERT carrying a generated-key clause and return the
    /// database-generated key value.
    fn insert(&mut self, sql: &str, params: &Params) -> Result<Value>;

    /// Begin a transaction.
    fn begin(&mut self) -> Result<()>;

    /// Commit the current transaction.
    fn commit(&mut self) -> Result<()>;

    /// Roll back the current transaction.
    fn rollback(&mut self) -> Result<()>;

    /// Execute a query and return the first row, if any.
    fn query_one(&mut self, sql: &str, params: &Params) -> Result<Option<Row>> {
        Ok(self.query(sql, params)?.into_iter().next())
    }

    /// Execute a query and return the first column of the first row.
    fn query_scalar(&mut self, sql: &str, params: &Params) -> Result<Option<Value>> {
        Ok(self
            .query_one(sql, params)?
            .and_then(|row| row.get(0).cloned()))
    }

    /// Check whether a table exists.
    ///
    /// The default probes with a zero-row SELECT and treats the typed
    /// [`TableMissing`](crate::Error::TableMissing) outcome as the
    /// "absent" branch; any other error propagates.
    fn table_exists(&mut self, table: &str) -> Result<bool> {
        match self.query(&format!("SELECT 1 FROM {table} WHERE 1 = 0"), &[]) {
            Ok(_) => Ok(true),
            Err(err) if err.is_table_missing() => Ok(false),
            Err(err) => Err(err),
        }
    }
}
