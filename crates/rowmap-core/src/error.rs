//! Error types for rowmap operations.

use std::fmt;

/// The primary error type for all rowmap operations.
#[derive(Debug)]
pub enum Error {
    /// Invalid caller-supplied input (null/empty names, bad page parameters)
    Argument(ArgumentError),
    /// Entity metadata cannot be resolved (missing primary key, empty property name)
    Mapping(MappingError),
    /// A semantic type has no entry in the dialect type map
    UnsupportedType(UnsupportedTypeError),
    /// A collection property lacks any resolvable relationship shape
    Relationship(RelationshipError),
    /// A non-query affected a different row count than declared expected
    ExpectedChangeMismatch(ExpectedChangeMismatch),
    /// The target table does not exist (translated from the driver's native code)
    TableMissing(TableMissingError),
    /// Driver-level execution error, propagated unchanged
    Execution(ExecutionError),
    /// Row-to-field type conversion errors
    Type(TypeError),
}

/// Invalid argument supplied by the caller.
#[derive(Debug)]
pub struct ArgumentError {
    /// Name of the offending argument, if known
    pub argument: Option<&'static str>,
    pub message: String,
}

/// Entity metadata could not be resolved.
#[derive(Debug)]
pub struct MappingError {
    /// The entity table or type the metadata pass was working on
    pub entity: String,
    pub message: String,
}

/// No dialect column type is mapped for a semantic type.
#[derive(Debug)]
pub struct UnsupportedTypeError {
    /// The semantic type name that missed the map (e.g. "Boolean")
    pub type_name: String,
    /// The dialect whose map was consulted
    pub dialect: String,
    /// The property that carried the type, if known
    pub property: Option<String>,
}

/// A collection property could not be classified.
#[derive(Debug)]
pub struct RelationshipError {
    pub entity: String,
    pub property: String,
    pub message: String,
}

/// Affected-row verification failed; the batch was rolled back.
#[derive(Debug)]
pub struct ExpectedChangeMismatch {
    pub expected: u64,
    pub actual: u64,
}

/// The statement referenced a table that does not exist.
#[derive(Debug)]
pub struct TableMissingError {
    pub table: String,
}

/// An error reported by the underlying driver.
#[derive(Debug)]
pub struct ExecutionError {
    /// The SQL text that failed, if available
    pub sql: Option<String>,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// A value could not be converted to the requested Rust type.
#[derive(Debug)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    pub column: Option<String>,
}

impl Error {
    /// Invalid argument with a free-form message.
    pub fn argument(message: impl Into<String>) -> Self {
        Error::Argument(ArgumentError {
            argument: None,
            message: message.into(),
        })
    }

    /// Invalid argument naming the offending parameter.
    pub fn argument_named(argument: &'static str, message: impl Into<String>) -> Self {
        Error::Argument(ArgumentError {
            argument: Some(argument),
            message: message.into(),
        })
    }

    /// Metadata resolution failure for an entity.
    pub fn mapping(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Mapping(MappingError {
            entity: entity.into(),
            message: message.into(),
        })
    }

    /// Missing type-map entry.
    pub fn unsupported_type(type_name: impl Into<String>, dialect: impl Into<String>) -> Self {
        Error::UnsupportedType(UnsupportedTypeError {
            type_name: type_name.into(),
            dialect: dialect.into(),
            property: None,
        })
    }

    /// Unclassifiable relationship.
    pub fn relationship(
        entity: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Relationship(RelationshipError {
            entity: entity.into(),
            property: property.into(),
            message: message.into(),
        })
    }

    /// Row-count verification failure.
    pub fn expected_change_mismatch(expected: u64, actual: u64) -> Self {
        Error::ExpectedChangeMismatch(ExpectedChangeMismatch { expected, actual })
    }

    /// Missing table, as a typed catchable outcome.
    pub fn table_missing(table: impl Into<String>) -> Self {
        Error::TableMissing(TableMissingError {
            table: table.into(),
        })
    }

    /// Driver error without SQL context.
    pub fn execution(message: impl Into<String>) -> Self {
        Error::Execution(ExecutionError {
            sql: None,
            message: message.into(),
            source: None,
        })
    }

    /// Driver error carrying the failed SQL text.
    pub fn execution_sql(sql: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Execution(ExecutionError {
            sql: Some(sql.into()),
            message: message.into(),
            source: None,
        })
    }

    /// Check whether this error is the typed "table absent" outcome.
    ///
    /// Callers use this to treat a missing table as a normal branch,
    /// e.g. during existence checks before DDL.
    #[must_use]
    pub const fn is_table_missing(&self) -> bool {
        matches!(self, Error::TableMissing(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Argument(e) => match e.argument {
                Some(name) => write!(f, "invalid argument `{}`: {}", name, e.message),
                None => write!(f, "invalid argument: {}", e.message),
            },
            Error::Mapping(e) => write!(f, "mapping error for `{}`: {}", e.entity, e.message),
            Error::UnsupportedType(e) => match &e.property {
                Some(prop) => write!(
                    f,
                    "no {} column type mapped for `{}` (property `{}`)",
                    e.dialect, e.type_name, prop
                ),
                None => write!(f, "no {} column type mapped for `{}`", e.dialect, e.type_name),
            },
            Error::Relationship(e) => write!(
                f,
                "relationship error on `{}.{}`: {}",
                e.entity, e.property, e.message
            ),
            Error::ExpectedChangeMismatch(e) => write!(
                f,
                "expected {} affected rows, got {}; batch rolled back",
                e.expected, e.actual
            ),
            Error::TableMissing(e) => write!(f, "table `{}` does not exist", e.table),
            Error::Execution(e) => match &e.sql {
                Some(sql) => write!(f, "execution failed: {} (sql: {})", e.message, sql),
                None => write!(f, "execution failed: {}", e.message),
            },
            Error::Type(e) => match &e.column {
                Some(col) => write!(
                    f,
                    "type error on column `{}`: expected {}, got {}",
                    col, e.expected, e.actual
                ),
                None => write!(f, "type error: expected {}, got {}", e.expected, e.actual),
            },
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Execution(e) => e
                .source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

/// Convenience result type for rowmap operations.
pub type Result<T> = std::result::Result<T, Error>;
