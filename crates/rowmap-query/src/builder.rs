//! DML statement builders.
//!
//! Each builder runs one metadata pass over an entity instance and
//! produces a finished [`Statement`] (or [`InsertPlan`]) for one dialect.
//! Builders are single-use: construct, configure, build.

use rowmap_core::{
    Entity, Error, ExtractOptions, NameRewriter, Property, RelationKind, Result, Value, classify,
    extract_properties, find_relation, junction_for, primary_key_field,
};
use tracing::debug;

use crate::dialect::{Dialect, GeneratedKeyClause};
use crate::statement::{InsertPlan, OWNER_KEY_HOLE, Statement};

fn table_name<E: Entity>(dialect: &dyn Dialect, over: Option<&str>) -> Result<String> {
    let name = match over {
        Some(t) if t.trim().is_empty() => {
            return Err(Error::argument_named("table", "override must not be empty"));
        }
        Some(t) => t,
        None => E::TABLE_NAME,
    };
    Ok(dialect.fit_identifier(name).to_string())
}

/// Builds an INSERT (plus pending link-table inserts) for one entity.
pub struct InsertBuilder<'a, E: Entity> {
    entity: &'a E,
    table: Option<&'a str>,
    ignore_links: bool,
    rewriter: NameRewriter,
}

impl<'a, E: Entity> InsertBuilder<'a, E> {
    #[must_use]
    pub fn new(entity: &'a E) -> Self {
        Self {
            entity,
            table: None,
            ignore_links: false,
            rewriter: NameRewriter::new(),
        }
    }

    /// Insert into a different table than the entity declares.
    #[must_use]
    pub fn table(mut self, table: &'a str) -> Self {
        self.table = Some(table);
        self
    }

    /// Skip link-table inserts even when the entity holds memberships.
    #[must_use]
    pub fn ignore_links(mut self, value: bool) -> Self {
        self.ignore_links = value;
        self
    }

    /// Apply find/replace pairs to derived junction table names.
    #[must_use]
    pub fn rewriter(mut self, rewriter: NameRewriter) -> Self {
        self.rewriter = rewriter;
        self
    }

    pub fn build(self, dialect: &dyn Dialect) -> Result<InsertPlan> {
        let table = table_name::<E>(dialect, self.table)?;
        let pk = primary_key_field::<E>()?;
        let props: Vec<Property> = extract_properties(self.entity, ExtractOptions::new())?
            .into_iter()
            .filter(|p| !p.info.auto_generated)
            .collect();
        if props.is_empty() {
            return Err(Error::mapping(table, "no insertable properties"));
        }

        let mut columns = Vec::with_capacity(props.len());
        let mut placeholders = Vec::with_capacity(props.len());
        for (i, prop) in props.iter().enumerate() {
            let column = dialect.fit_identifier(prop.column_name());
            columns.push(column.to_string());
            placeholders.push(dialect.placeholder(column, i));
        }

        let mut sql = format!(
            "INSERT INTO {} ({})",
            table,
            columns.join(", ")
        );
        let mut output_param = None;
        if pk.auto_generated {
            match dialect.generated_key_clause(dialect.fit_identifier(pk.column_name)) {
                GeneratedKeyClause::OutputInserted { column } => {
                    sql.push_str(&format!(" OUTPUT INSERTED.{column}"));
                }
                GeneratedKeyClause::ReturningInto {
                    column,
                    output_param: out,
                } => {
                    output_param = Some((column, out));
                }
                GeneratedKeyClause::Returning { column } => {
                    output_param = Some((column, String::new()));
                }
            }
        }
        sql.push_str(&format!(" VALUES ({})", placeholders.join(", ")));
        if let Some((column, out)) = &output_param {
            if out.is_empty() {
                sql.push_str(&format!(" RETURNING {column}"));
            } else {
                sql.push_str(&format!(" RETURNING {column} INTO {}", dialect.placeholder(out, props.len())));
            }
        }

        let mut primary = Statement::new(sql)?;
        for (prop, column) in props.iter().zip(&columns) {
            primary = primary.bind(column.clone(), prop.value.clone())?;
        }
        if let Some((_, out)) = output_param {
            if !out.is_empty() {
                primary = primary.output(out);
            }
        }

        if self.ignore_links {
            return Ok(InsertPlan::single(primary));
        }

        // Membership rows become junction inserts; for an unsaved owner
        // the local key is a named hole filled after execution.
        let key_known = !pk.auto_generated || !self.entity.is_new();
        let owner_key = self.entity.primary_key_value();
        let mut links = Vec::new();
        for (name, keys) in self.entity.link_rows() {
            if keys.is_empty() {
                continue;
            }
            let relation = find_relation(E::RELATIONS, name).ok_or_else(|| {
                Error::mapping(E::TABLE_NAME, format!("unknown relationship `{name}`"))
            })?;
            if classify(E::TABLE_NAME, relation)? != RelationKind::ManyToMany {
                debug!(relation = name, "skipping link rows for non-junction relationship");
                continue;
            }
            let junction = junction_for(E::TABLE_NAME, relation, &self.rewriter);
            for key in keys {
                let sql = format!(
                    "INSERT INTO {} ({}, {}) VALUES ({}, {})",
                    dialect.fit_identifier(&junction.table_name),
                    junction.local_column,
                    junction.remote_column,
                    dialect.placeholder(OWNER_KEY_HOLE, 0),
                    dialect.placeholder("RelatedKey", 1),
                );
                let local = if key_known { owner_key.clone() } else { Value::Null };
                links.push(
                    Statement::new(sql)?
                        .bind(OWNER_KEY_HOLE, local)?
                        .bind("RelatedKey", key)?,
                );
            }
        }

        if links.is_empty() {
            Ok(InsertPlan::single(primary))
        } else if key_known {
            Ok(InsertPlan::with_bound_links(primary, links))
        } else {
            Ok(InsertPlan::with_links(primary, links, OWNER_KEY_HOLE))
        }
    }
}

/// Builds an UPDATE keyed on the primary key (or a named substitute).
pub struct UpdateBuilder<'a, E: Entity> {
    entity: &'a E,
    table: Option<&'a str>,
    key_property: Option<&'a str>,
}

impl<'a, E: Entity> UpdateBuilder<'a, E> {
    #[must_use]
    pub fn new(entity: &'a E) -> Self {
        Self {
            entity,
            table: None,
            key_property: None,
        }
    }

    /// Update a different table than the entity declares.
    #[must_use]
    pub fn table(mut self, table: &'a str) -> Self {
        self.table = Some(table);
        self
    }

    /// Key the WHERE clause on a property other than the primary key.
    #[must_use]
    pub fn key_property(mut self, name: &'a str) -> Self {
        self.key_property = Some(name);
        self
    }

    pub fn build(self, dialect: &dyn Dialect) -> Result<Statement> {
        let table = table_name::<E>(dialect, self.table)?;
        let props = extract_properties(self.entity, ExtractOptions::new())?;

        let key_name = match self.key_property {
            Some(name) => name,
            None => primary_key_field::<E>()?.name,
        };
        let key = props
            .iter()
            .find(|p| p.name() == key_name)
            .ok_or_else(|| {
                Error::mapping(E::TABLE_NAME, format!("no key property `{key_name}`"))
            })?
            .clone();
        if key.value.is_default_key() {
            return Err(Error::argument_named(
                "entity",
                "cannot update a row without a key value",
            ));
        }

        let assignable: Vec<&Property> = props
            .iter()
            .filter(|p| p.name() != key_name && !p.info.auto_generated)
            .collect();
        if assignable.is_empty() {
            return Err(Error::mapping(table, "no assignable properties"));
        }

        let mut sets = Vec::with_capacity(assignable.len());
        for (i, prop) in assignable.iter().enumerate() {
            let column = dialect.fit_identifier(prop.column_name());
            sets.push(format!("{} = {}", column, dialect.placeholder(column, i)));
        }
        let key_column = dialect.fit_identifier(key.column_name());
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            table,
            sets.join(", "),
            key_column,
            dialect.placeholder(key_column, assignable.len()),
        );

        let mut stmt = Statement::new(sql)?;
        for prop in &assignable {
            stmt = stmt.bind(dialect.fit_identifier(prop.column_name()), prop.value.clone())?;
        }
        stmt.bind(key_column, key.value)
    }
}

/// Resolve the key property an instance statement filters on: the
/// primary key by default, or a named substitute.
fn key_descriptor<E: Entity>(
    entity: &E,
    key_property: Option<&str>,
) -> Result<(&'static str, Value)> {
    match key_property {
        None => {
            let pk = primary_key_field::<E>()?;
            Ok((pk.column_name, entity.primary_key_value()))
        }
        Some(name) => {
            let props = extract_properties(entity, ExtractOptions::new())?;
            let prop = props.iter().find(|p| p.name() == name).ok_or_else(|| {
                Error::mapping(E::TABLE_NAME, format!("no key property `{name}`"))
            })?;
            Ok((prop.column_name(), prop.value.clone()))
        }
    }
}

/// Builds a DELETE keyed on the primary key (or a named substitute).
pub struct DeleteBuilder<'a, E: Entity> {
    entity: &'a E,
    table: Option<&'a str>,
    key_property: Option<&'a str>,
}

impl<'a, E: Entity> DeleteBuilder<'a, E> {
    #[must_use]
    pub fn new(entity: &'a E) -> Self {
        Self {
            entity,
            table: None,
            key_property: None,
        }
    }

    /// Delete from a different table than the entity declares.
    #[must_use]
    pub fn table(mut self, table: &'a str) -> Self {
        self.table = Some(table);
        self
    }

    /// Key the WHERE clause on a property other than the primary key.
    #[must_use]
    pub fn key_property(mut self, name: &'a str) -> Self {
        self.key_property = Some(name);
        self
    }

    pub fn build(self, dialect: &dyn Dialect) -> Result<Statement> {
        let table = table_name::<E>(dialect, self.table)?;
        let (key_column, key) = key_descriptor(self.entity, self.key_property)?;
        if key.is_default_key() {
            return Err(Error::argument_named(
                "entity",
                "cannot delete a row without a key value",
            ));
        }
        let column = dialect.fit_identifier(key_column);
        let sql = format!(
            "DELETE FROM {} WHERE {} = {}",
            table,
            column,
            dialect.placeholder(column, 0),
        );
        Statement::new(sql)?.bind(column, key)
    }
}

/// Build a SELECT over an entity's table with an optional raw filter.
///
/// A missing filter yields the always-true `(1 = 1)` form so callers can
/// append further conditions uniformly.
pub fn build_select<E: Entity>(
    dialect: &dyn Dialect,
    filter: Option<&str>,
    table: Option<&str>,
) -> Result<Statement> {
    let table = table_name::<E>(dialect, table)?;
    let condition = match filter {
        Some(f) if f.trim().is_empty() => {
            return Err(Error::argument_named("filter", "must not be empty when supplied"));
        }
        Some(f) => f,
        None => "1 = 1",
    };
    Statement::new(format!("SELECT * FROM {table} WHERE ({condition})"))
}

/// Build a get-by-key SELECT for an entity instance's current key value,
/// optionally keyed on a property other than the primary key.
pub fn build_search<E: Entity>(
    dialect: &dyn Dialect,
    entity: &E,
    key_property: Option<&str>,
) -> Result<Statement> {
    let table = table_name::<E>(dialect, None)?;
    let (key_column, key) = key_descriptor(entity, key_property)?;
    if key.is_default_key() {
        return Err(Error::argument_named(
            "entity",
            "cannot search without a key value",
        ));
    }
    let column = dialect.fit_identifier(key_column);
    Statement::new(format!(
        "SELECT * FROM {} WHERE {} = {}",
        table,
        column,
        dialect.placeholder(column, 0),
    ))?
    .bind(column, key)
}
