//! Property and column definitions.

use crate::types::ScalarType;
use crate::value::Value;

/// Static metadata about one entity property/column.
///
/// Declared once per entity type, typically in the entity's
/// [`Entity::fields`](crate::Entity::fields) table.
#[derive(Debug, Clone)]
pub struct PropertyInfo {
    /// Logical property name
    pub name: &'static str,
    /// Database column name (may differ from the property name)
    pub column_name: &'static str,
    /// Semantic column type
    pub scalar_type: ScalarType,
    /// Whether the column accepts NULL
    pub nullable: bool,
    /// Whether a value must be supplied on insert
    pub required: bool,
    /// Whether this is the primary key
    pub primary_key: bool,
    /// Whether the database generates the value (identity/sequence keys)
    pub auto_generated: bool,
    /// Whether the property is excluded from persistence
    pub unmapped: bool,
    /// Foreign key reference as `"table.column"`, if any
    pub foreign_key: Option<&'static str>,
    /// Minimum accepted text length (emitted as a CHECK constraint)
    pub min_length: Option<u32>,
    /// Maximum text length (sizes the column type)
    pub max_length: Option<u32>,
}

impl PropertyInfo {
    /// Create a new property with minimal required data.
    #[must_use]
    pub const fn new(name: &'static str, column_name: &'static str, scalar_type: ScalarType) -> Self {
        Self {
            name,
            column_name,
            scalar_type,
            nullable: false,
            required: false,
            primary_key: false,
            auto_generated: false,
            unmapped: false,
            foreign_key: None,
            min_length: None,
            max_length: None,
        }
    }

    /// Set the database column name.
    #[must_use]
    pub const fn column(mut self, name: &'static str) -> Self {
        self.column_name = name;
        self
    }

    /// Set the nullable flag.
    #[must_use]
    pub const fn nullable(mut self, value: bool) -> Self {
        self.nullable = value;
        self
    }

    /// Set the required flag.
    #[must_use]
    pub const fn required(mut self, value: bool) -> Self {
        self.required = value;
        self
    }

    /// Mark as the primary key.
    #[must_use]
    pub const fn primary_key(mut self, value: bool) -> Self {
        self.primary_key = value;
        self
    }

    /// Mark the value as database-generated.
    #[must_use]
    pub const fn auto_generated(mut self, value: bool) -> Self {
        self.auto_generated = value;
        self
    }

    /// Exclude this property from persistence.
    #[must_use]
    pub const fn unmapped(mut self, value: bool) -> Self {
        self.unmapped = value;
        self
    }

    /// Set a foreign key reference (`"table.column"`).
    #[must_use]
    pub const fn foreign_key(mut self, reference: &'static str) -> Self {
        self.foreign_key = Some(reference);
        self
    }

    /// Set minimum and maximum text lengths.
    #[must_use]
    pub const fn length(mut self, min: u32, max: u32) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    /// Set only the maximum text length.
    #[must_use]
    pub const fn max_length(mut self, max: u32) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Split a `"table.column"` foreign key reference into its parts.
    #[must_use]
    pub fn foreign_key_parts(&self) -> Option<(&'static str, &'static str)> {
        let fk = self.foreign_key?;
        let (table, column) = fk.split_once('.')?;
        Some((table, column))
    }
}

/// A runtime property descriptor: static metadata plus the current value.
///
/// Produced fresh on every metadata pass and discarded after the statement
/// is built; never cached or mutated.
#[derive(Debug, Clone)]
pub struct Property {
    /// The static declaration this descriptor was built from
    pub info: &'static PropertyInfo,
    /// The entity instance's current value
    pub value: Value,
}

impl Property {
    /// Create a descriptor pairing static metadata with a runtime value.
    #[must_use]
    pub const fn new(info: &'static PropertyInfo, value: Value) -> Self {
        Self { info, value }
    }

    /// The logical property name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.info.name
    }

    /// The database-facing column name.
    #[must_use]
    pub fn column_name(&self) -> &'static str {
        self.info.column_name
    }

    /// The value converted to the textual form the dialect expects.
    ///
    /// Booleans render 1/0, temporals render canonical strings, decimals
    /// render their digit text.
    #[must_use]
    pub fn sql_text(&self) -> String {
        self.value.to_sql_literal()
    }
}
