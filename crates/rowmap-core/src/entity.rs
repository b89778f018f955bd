//! Entity trait for table-mapped types.
//!
//! The `Entity` trait is the closed, compile-time schema declaration that
//! replaces runtime reflection: each mapped type declares its table name,
//! property metadata, and relationships as static data, and converts
//! between itself and dynamic rows.

use crate::Result;
use crate::error::Error;
use crate::property::PropertyInfo;
use crate::relation::RelationInfo;
use crate::row::Row;
use crate::value::Value;

/// Trait for types that map to database tables.
///
/// # Example
///
/// ```ignore
/// struct Hero {
///     id: Option<i64>,
///     name: String,
///     team_id: Option<i64>,
/// }
///
/// impl Entity for Hero {
///     const TABLE_NAME: &'static str = "heroes";
///
///     fn fields() -> &'static [PropertyInfo] {
///         static FIELDS: &[PropertyInfo] = &[
///             PropertyInfo::new("id", "id", ScalarType::BigInt)
///                 .primary_key(true)
///                 .auto_generated(true),
///             PropertyInfo::new("name", "name", ScalarType::String),
///             PropertyInfo::new("team_id", "team_id", ScalarType::BigInt)
///                 .nullable(true)
///                 .foreign_key("teams.id"),
///         ];
///         FIELDS
///     }
///     // ...
/// }
/// ```
pub trait Entity: Sized + Send + Sync {
    /// The name of the database table.
    const TABLE_NAME: &'static str;

    /// Relationship metadata for this entity type.
    ///
    /// Types with no navigation properties rely on the default empty slice.
    const RELATIONS: &'static [RelationInfo] = &[];

    /// Get property metadata for all columns.
    fn fields() -> &'static [PropertyInfo];

    /// Convert this instance to a row of named values.
    ///
    /// Order must match `fields()`; names are the logical property names.
    fn to_row(&self) -> Vec<(&'static str, Value)>;

    /// Construct an instance from a database row.
    fn from_row(row: &Row) -> Result<Self>;

    /// Get the current primary key value.
    fn primary_key_value(&self) -> Value;

    /// Check if this is a new record (primary key not yet assigned).
    fn is_new(&self) -> bool;

    /// Current in-memory membership of each many-to-many collection.
    ///
    /// Returns, per relationship name, the primary key values of the
    /// related entities this instance currently holds. The statement
    /// builder turns these into link-table rows; the default suits types
    /// with no collections.
    fn link_rows(&self) -> Vec<(&'static str, Vec<Value>)> {
        Vec::new()
    }

    /// Receive related rows fetched by the inclusion resolver.
    ///
    /// Implementations materialize the rows (via the related type's
    /// `from_row`) and assign them onto the named navigation property.
    /// The default ignores resolved relations.
    fn apply_related(&mut self, relation: &'static str, rows: Vec<Row>) -> Result<()> {
        let _ = (relation, rows);
        Ok(())
    }
}

/// Resolve the primary key property of an entity type.
///
/// Exactly one property must be marked as the primary key; zero or more
/// than one is a configuration error, never silently guessed around.
pub fn primary_key_field<E: Entity>() -> Result<&'static PropertyInfo> {
    primary_key_of(E::TABLE_NAME, E::fields())
}

/// Resolve the primary key from a raw metadata table.
pub fn primary_key_of<'a>(table: &str, fields: &'a [PropertyInfo]) -> Result<&'a PropertyInfo> {
    let mut keys = fields.iter().filter(|f| f.primary_key);
    let first = keys.next().ok_or_else(|| {
        Error::mapping(table, "no property is declared as the primary key")
    })?;
    if keys.next().is_some() {
        return Err(Error::mapping(
            table,
            "more than one property is declared as the primary key",
        ));
    }
    Ok(first)
}
