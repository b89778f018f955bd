//! CREATE TABLE synthesis.
//!
//! One builder turns an entity type's metadata into the primary table's
//! DDL plus one junction-table DDL per many-to-many collection. Column
//! types come from a caller-supplied [`TypeMap`] or the dialect default.

use std::marker::PhantomData;

use rowmap_core::{
    Entity, Error, NameRewriter, RelationKind, Result, ScalarType, TypeMap, classify,
    junction_for, primary_key_of,
};
use tracing::debug;

use crate::dialect::{Dialect, resolve_column_type};
use crate::statement::Statement;

fn column_type(
    dialect: &dyn Dialect,
    map: Option<&TypeMap>,
    scalar: ScalarType,
    max_length: Option<u32>,
    property: &str,
) -> Result<String> {
    resolve_column_type(dialect, map, scalar, max_length).map_err(|err| match err {
        Error::UnsupportedType(mut inner) => {
            inner.property = Some(property.to_string());
            Error::UnsupportedType(inner)
        }
        other => other,
    })
}

/// Builds CREATE TABLE statements for an entity type.
pub struct CreateTableBuilder<'a, E: Entity> {
    type_map: Option<&'a TypeMap>,
    only_primary: bool,
    ignore: Vec<&'a str>,
    table: Option<&'a str>,
    rewriter: NameRewriter,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity> Default for CreateTableBuilder<'a, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, E: Entity> CreateTableBuilder<'a, E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            type_map: None,
            only_primary: false,
            ignore: Vec::new(),
            table: None,
            rewriter: NameRewriter::new(),
            _entity: PhantomData,
        }
    }

    /// Use a caller-supplied type map instead of the dialect default.
    #[must_use]
    pub fn type_map(mut self, map: &'a TypeMap) -> Self {
        self.type_map = Some(map);
        self
    }

    /// Emit only the primary table, skipping junction tables.
    #[must_use]
    pub fn only_primary(mut self, value: bool) -> Self {
        self.only_primary = value;
        self
    }

    /// Skip the named properties entirely.
    #[must_use]
    pub fn ignore(mut self, property: &'a str) -> Self {
        self.ignore.push(property);
        self
    }

    /// Create a different table than the entity declares.
    #[must_use]
    pub fn table(mut self, table: &'a str) -> Self {
        self.table = Some(table);
        self
    }

    /// Apply find/replace pairs to derived junction table names.
    #[must_use]
    pub fn rewriter(mut self, rewriter: NameRewriter) -> Self {
        self.rewriter = rewriter;
        self
    }

    /// Build the DDL statements: the primary table first, then one
    /// junction table per many-to-many collection.
    pub fn build(self, dialect: &dyn Dialect) -> Result<Vec<Statement>> {
        let table = match self.table {
            Some(t) if t.trim().is_empty() => {
                return Err(Error::argument_named("table", "override must not be empty"));
            }
            Some(t) => dialect.fit_identifier(t),
            None => dialect.fit_identifier(E::TABLE_NAME),
        };

        let mut columns = Vec::new();
        let mut constraints = Vec::new();
        for info in E::fields() {
            if info.unmapped || self.ignore.contains(&info.name) {
                continue;
            }
            let column = dialect.fit_identifier(info.column_name);
            let type_text = column_type(
                dialect,
                self.type_map,
                info.scalar_type,
                info.max_length,
                info.name,
            )?;
            let mut def = format!("{column} {type_text}");
            if info.primary_key {
                def.push_str(" PRIMARY KEY");
            } else if !info.nullable {
                def.push_str(" NOT NULL");
            }
            if let Some(min) = info.min_length {
                def.push_str(&format!(" CHECK(LENGTH({column}) >= {min})"));
            }
            columns.push(def);

            if let Some((ref_table, ref_column)) = info.foreign_key_parts() {
                constraints.push(format!(
                    "FOREIGN KEY ({column}) REFERENCES {}({ref_column})",
                    dialect.fit_identifier(ref_table),
                ));
            }
        }
        if columns.is_empty() {
            return Err(Error::mapping(table, "no mappable columns"));
        }
        columns.extend(constraints);

        let mut out = vec![Statement::new(format!(
            "CREATE TABLE {} ({})",
            table,
            columns.join(", ")
        ))?];

        if self.only_primary {
            return Ok(out);
        }

        let owner_pk = primary_key_of(E::TABLE_NAME, E::fields())?;
        for relation in E::RELATIONS {
            if !relation.collection {
                continue;
            }
            if classify(E::TABLE_NAME, relation)? != RelationKind::ManyToMany {
                debug!(relation = relation.name, "no junction table for one-to-many collection");
                continue;
            }
            let junction = junction_for(E::TABLE_NAME, relation, &self.rewriter);
            let related_pk =
                primary_key_of(relation.related_table, (relation.related_fields_fn)())?;
            let local_type = column_type(
                dialect,
                self.type_map,
                owner_pk.scalar_type,
                None,
                owner_pk.name,
            )?;
            let remote_type = column_type(
                dialect,
                self.type_map,
                related_pk.scalar_type,
                None,
                related_pk.name,
            )?;
            out.push(Statement::new(format!(
                "CREATE TABLE {jt} ({local} {local_type} NOT NULL, {remote} {remote_type} NOT NULL, \
                 PRIMARY KEY ({local}, {remote}), \
                 FOREIGN KEY ({local}) REFERENCES {owner}({owner_key}), \
                 FOREIGN KEY ({remote}) REFERENCES {related}({related_key}))",
                jt = dialect.fit_identifier(&junction.table_name),
                local = junction.local_column,
                remote = junction.remote_column,
                owner = table,
                owner_key = owner_pk.column_name,
                related = dialect.fit_identifier(relation.related_table),
                related_key = related_pk.column_name,
            ))?);
        }

        Ok(out)
    }
}
