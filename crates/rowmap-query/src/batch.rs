//! Transactional batch execution.
//!
//! A batch runs under one transaction: begin, execute each statement,
//! verify the affected-row total against the caller's expectation, then
//! commit. Any failure or a count mismatch rolls the whole batch back,
//! leaving the database unchanged.

use rowmap_core::{Error, Result, SqlExecutor, Value};
use tracing::{debug, warn};

use crate::statement::{InsertPlan, Statement};

fn roll_back(exec: &mut dyn SqlExecutor) {
    if let Err(err) = exec.rollback() {
        warn!(error = %err, "rollback itself failed");
    }
}

/// Execute one statement outside any managed transaction.
pub fn execute_statement(exec: &mut dyn SqlExecutor, stmt: &Statement) -> Result<u64> {
    exec.execute(stmt.sql(), stmt.params())
}

/// Execute a batch of statements in a single transaction.
///
/// Returns the total number of affected rows. When `expected_changes`
/// is supplied and the total differs, the transaction is rolled back
/// and the mismatch reported as a typed error; the original error is
/// preserved when any statement fails.
pub fn execute_batch(
    exec: &mut dyn SqlExecutor,
    statements: &[Statement],
    expected_changes: Option<u64>,
) -> Result<u64> {
    if statements.is_empty() {
        debug!("empty batch, nothing to execute");
        return Ok(0);
    }

    exec.begin()?;
    let mut total = 0u64;
    for stmt in statements {
        match exec.execute(stmt.sql(), stmt.params()) {
            Ok(affected) => total += affected,
            Err(err) => {
                roll_back(exec);
                return Err(err);
            }
        }
    }

    if let Some(expected) = expected_changes {
        if expected != total {
            roll_back(exec);
            return Err(Error::expected_change_mismatch(expected, total));
        }
    }

    exec.commit()?;
    Ok(total)
}

/// Execute an insert plan in a single transaction.
///
/// The primary INSERT runs first; its generated key fills the named
/// hole in the pending link statements, which then run in order. The
/// generated key (or `Value::Null` for non-generated keys) is returned.
pub fn execute_insert_plan(exec: &mut dyn SqlExecutor, plan: InsertPlan) -> Result<Value> {
    exec.begin()?;

    let key = match exec.insert(plan.primary().sql(), plan.primary().params()) {
        Ok(key) => key,
        Err(err) => {
            roll_back(exec);
            return Err(err);
        }
    };

    let links = match plan.bind_generated_key(&key) {
        Ok(links) => links,
        Err(err) => {
            roll_back(exec);
            return Err(err);
        }
    };
    for stmt in &links {
        if let Err(err) = exec.execute(stmt.sql(), stmt.params()) {
            roll_back(exec);
            return Err(err);
        }
    }

    exec.commit()?;
    Ok(key)
}
