//! Inclusion resolution: loading related rows onto an entity.
//!
//! Two passes cover the two navigation shapes. Foreign-key navigations
//! resolve through a get-by-key SELECT on the related table; collection
//! navigations resolve through the back-pointing foreign key or the
//! junction table, depending on classification. Missing related rows are
//! tolerated and logged, never raised.

use rowmap_core::{
    Entity, Error, RelationInfo, RelationKind, Result, NameRewriter, SqlExecutor, classify,
    foreign_key_lookups, junction_for, primary_key_of,
};
use tracing::debug;

use crate::dialect::Dialect;

/// Resolve foreign-key navigations, loading each referenced row and
/// handing it to the entity.
///
/// `only` restricts the pass to one named navigation. Null keys and
/// dangling references leave the navigation at its default.
pub fn include_foreign_keys<E: Entity>(
    exec: &mut dyn SqlExecutor,
    entity: &mut E,
    dialect: &dyn Dialect,
    only: Option<&str>,
) -> Result<()> {
    let lookups = foreign_key_lookups(entity);
    if lookups.is_empty() {
        debug!(table = E::TABLE_NAME, "no foreign-key navigations to resolve");
        return Ok(());
    }

    for lookup in lookups {
        if only.is_some_and(|name| name != lookup.relation.name) {
            continue;
        }
        let Some(related_pk) = lookup.related_pk else {
            debug!(
                relation = lookup.relation.name,
                "related type declares no primary key, skipping"
            );
            continue;
        };
        if !lookup.has_key() {
            debug!(relation = lookup.relation.name, "null key, nothing to resolve");
            continue;
        }

        let sql = format!(
            "SELECT * FROM {} WHERE {} = {}",
            dialect.fit_identifier(lookup.relation.related_table),
            related_pk,
            dialect.placeholder("Key", 0),
        );
        let rows = exec.query(&sql, &[("Key".to_string(), lookup.key.clone())])?;
        if rows.is_empty() {
            debug!(
                relation = lookup.relation.name,
                "referenced row not found, leaving navigation unset"
            );
            continue;
        }
        entity.apply_related(lookup.relation.name, rows)?;
    }
    Ok(())
}

fn back_fk_column(owner_table: &str, relation: &RelationInfo) -> Result<&'static str> {
    if let Some(column) = relation.remote_fk {
        return Ok(column);
    }
    (relation.related_fields_fn)()
        .iter()
        .find(|f| {
            f.foreign_key_parts()
                .is_some_and(|(table, _)| table == owner_table)
        })
        .map(|f| f.column_name)
        .ok_or_else(|| {
            Error::relationship(
                owner_table,
                relation.name,
                "no foreign key on the related type points back at the owner",
            )
        })
}

/// Resolve collection navigations, loading the member rows and handing
/// them to the entity.
///
/// One-to-many collections load through the back-pointing foreign key;
/// many-to-many collections load through junction membership in a single
/// semijoin query per navigation.
pub fn include_collections<E: Entity>(
    exec: &mut dyn SqlExecutor,
    entity: &mut E,
    dialect: &dyn Dialect,
    rewriter: &NameRewriter,
    only: Option<&str>,
) -> Result<()> {
    let owner_key = entity.primary_key_value();
    if owner_key.is_default_key() {
        debug!(table = E::TABLE_NAME, "unsaved row has no stored collections");
        return Ok(());
    }

    for relation in E::RELATIONS {
        if !relation.collection {
            continue;
        }
        if only.is_some_and(|name| name != relation.name) {
            continue;
        }

        let related = dialect.fit_identifier(relation.related_table);
        let sql = match classify(E::TABLE_NAME, relation)? {
            RelationKind::OneToMany => {
                let fk = back_fk_column(E::TABLE_NAME, relation)?;
                format!(
                    "SELECT * FROM {related} WHERE {fk} = {}",
                    dialect.placeholder("OwnerKey", 0),
                )
            }
            RelationKind::ManyToMany => {
                let junction = junction_for(E::TABLE_NAME, relation, rewriter);
                let related_pk =
                    primary_key_of(relation.related_table, (relation.related_fields_fn)())?;
                format!(
                    "SELECT * FROM {related} WHERE {} IN \
                     (SELECT {} FROM {} WHERE {} = {})",
                    related_pk.column_name,
                    junction.remote_column,
                    dialect.fit_identifier(&junction.table_name),
                    junction.local_column,
                    dialect.placeholder("OwnerKey", 0),
                )
            }
        };

        let rows = exec.query(&sql, &[("OwnerKey".to_string(), owner_key.clone())])?;
        entity.apply_related(relation.name, rows)?;
    }
    Ok(())
}
