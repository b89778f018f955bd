//! Junction-table membership maintenance.
//!
//! Link and unlink statements add or remove a single membership row;
//! [`sync_links`] diffs an entity's in-memory collections against the
//! stored junction rows and returns the statements that reconcile them.

use rowmap_core::{
    Entity, Error, JunctionTable, NameRewriter, RelationKind, Result, SqlExecutor, Value,
    classify, find_relation, junction_for,
};
use tracing::debug;

use crate::dialect::Dialect;
use crate::statement::Statement;

/// Build an INSERT adding one membership row.
pub fn link_statement(
    dialect: &dyn Dialect,
    junction: &JunctionTable,
    owner_key: Value,
    related_key: Value,
) -> Result<Statement> {
    let sql = format!(
        "INSERT INTO {} ({}, {}) VALUES ({}, {})",
        dialect.fit_identifier(&junction.table_name),
        junction.local_column,
        junction.remote_column,
        dialect.placeholder("OwnerKey", 0),
        dialect.placeholder("RelatedKey", 1),
    );
    Statement::new(sql)?
        .bind("OwnerKey", owner_key)?
        .bind("RelatedKey", related_key)
}

/// Build a DELETE removing one membership row.
pub fn unlink_statement(
    dialect: &dyn Dialect,
    junction: &JunctionTable,
    owner_key: Value,
    related_key: Value,
) -> Result<Statement> {
    let sql = format!(
        "DELETE FROM {} WHERE {} = {} AND {} = {}",
        dialect.fit_identifier(&junction.table_name),
        junction.local_column,
        dialect.placeholder("OwnerKey", 0),
        junction.remote_column,
        dialect.placeholder("RelatedKey", 1),
    );
    Statement::new(sql)?
        .bind("OwnerKey", owner_key)?
        .bind("RelatedKey", related_key)
}

/// Read the related-side keys currently stored for one owner.
pub fn stored_memberships(
    exec: &mut dyn SqlExecutor,
    dialect: &dyn Dialect,
    junction: &JunctionTable,
    owner_key: &Value,
) -> Result<Vec<Value>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        junction.remote_column,
        dialect.fit_identifier(&junction.table_name),
        junction.local_column,
        dialect.placeholder("OwnerKey", 0),
    );
    let rows = exec.query(&sql, &[("OwnerKey".to_string(), owner_key.clone())])?;
    Ok(rows
        .into_iter()
        .filter_map(|row| row.get(0).cloned())
        .collect())
}

/// Diff an entity's many-to-many collections against the stored junction
/// rows and return the link/unlink statements that reconcile them.
///
/// The symmetric difference drives the output: keys held in memory but
/// not stored become inserts, stored keys no longer held become deletes.
/// Rows already on both sides produce nothing.
pub fn sync_links<E: Entity>(
    exec: &mut dyn SqlExecutor,
    entity: &E,
    dialect: &dyn Dialect,
    rewriter: &NameRewriter,
) -> Result<Vec<Statement>> {
    let owner_key = entity.primary_key_value();
    if owner_key.is_default_key() {
        return Err(Error::argument_named(
            "entity",
            "cannot synchronize memberships of an unsaved row",
        ));
    }

    let mut out = Vec::new();
    for (name, desired) in entity.link_rows() {
        let relation = find_relation(E::RELATIONS, name).ok_or_else(|| {
            Error::mapping(E::TABLE_NAME, format!("unknown relationship `{name}`"))
        })?;
        if classify(E::TABLE_NAME, relation)? != RelationKind::ManyToMany {
            debug!(relation = name, "skipping membership sync for non-junction relationship");
            continue;
        }
        let junction = junction_for(E::TABLE_NAME, relation, rewriter);
        let stored = stored_memberships(exec, dialect, &junction, &owner_key)?;

        for key in &desired {
            if !stored.contains(key) {
                out.push(link_statement(
                    dialect,
                    &junction,
                    owner_key.clone(),
                    key.clone(),
                )?);
            }
        }
        for key in &stored {
            if !desired.contains(key) {
                out.push(unlink_statement(
                    dialect,
                    &junction,
                    owner_key.clone(),
                    key.clone(),
                )?);
            }
        }
    }

    Ok(out)
}
