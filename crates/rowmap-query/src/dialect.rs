//! SQL dialects.
//!
//! A [`Dialect`] is a small strategy object answering the questions that
//! vary between database engines: how to spell a bind placeholder, how an
//! INSERT surfaces its generated key, how paging is expressed, and which
//! column types the semantic types map to by default. Statement builders
//! take `&dyn Dialect` and never branch on engine names themselves.

use rowmap_core::{ScalarType, TypeMap};

/// How a generated-key INSERT surfaces the new key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedKeyClause {
    /// Appended after the VALUES list; the key arrives through a declared
    /// output bind (`RETURNING id INTO :Result`).
    ReturningInto {
        column: String,
        output_param: String,
    },
    /// Injected between the column list and VALUES
    /// (`OUTPUT INSERTED.id`); the key arrives as a result row.
    OutputInserted { column: String },
    /// Appended after the VALUES list (`RETURNING id`); the key arrives
    /// as a result row.
    Returning { column: String },
}

/// Engine-specific SQL spelling.
///
/// Implementations are stateless and cheap to construct; the builders
/// hold a `&dyn Dialect` for the duration of one build.
pub trait Dialect: Send + Sync {
    /// Lowercase dialect name used in type maps and diagnostics.
    fn name(&self) -> &'static str;

    /// Quote an identifier for use in hand-written filters.
    fn quote_identifier(&self, name: &str) -> String;

    /// Render the bind placeholder for the parameter at `index`
    /// (zero-based, declaration order) named `name`.
    fn placeholder(&self, name: &str, index: usize) -> String;

    /// How an INSERT into a table with a generated key column surfaces
    /// the new key.
    fn generated_key_clause(&self, column: &str) -> GeneratedKeyClause;

    /// Render a paged SELECT over `base`.
    ///
    /// `offset` and `limit` are already validated row counts; `order_by`
    /// is a ready ORDER BY expression (column plus direction) or absent,
    /// in which case the dialect picks a stable placeholder ordering.
    fn paged_query(&self, base: &str, offset: i64, limit: i64, order_by: Option<&str>) -> String;

    /// The dialect's maximum identifier length.
    fn max_identifier_len(&self) -> usize;

    /// The default semantic-to-column type map.
    fn default_type_map(&self) -> TypeMap;

    /// Truncate an identifier to the dialect's length budget.
    fn fit_identifier<'a>(&self, name: &'a str) -> &'a str {
        match name.char_indices().nth(self.max_identifier_len()) {
            Some((idx, _)) => &name[..idx],
            None => name,
        }
    }
}

/// Oracle: `:name` binds, `RETURNING ... INTO`, ROW_NUMBER paging, a
/// 30-character identifier budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct Oracle;

impl Dialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name)
    }

    fn placeholder(&self, name: &str, _index: usize) -> String {
        format!(":{}", name)
    }

    fn generated_key_clause(&self, column: &str) -> GeneratedKeyClause {
        GeneratedKeyClause::ReturningInto {
            column: column.to_string(),
            output_param: "Result".to_string(),
        }
    }

    fn paged_query(&self, base: &str, offset: i64, limit: i64, order_by: Option<&str>) -> String {
        // Constant ordinal ordering when the caller does not sort; the
        // window function requires some ORDER BY.
        let order = order_by.unwrap_or("1");
        format!(
            "SELECT * FROM (SELECT q.*, ROW_NUMBER() OVER (ORDER BY {order}) AS RN \
             FROM ({base}) q) WHERE RN BETWEEN {} AND {}",
            offset + 1,
            offset + limit
        )
    }

    fn max_identifier_len(&self) -> usize {
        30
    }

    fn default_type_map(&self) -> TypeMap {
        TypeMap::new(self.name())
            .with("Boolean", "NUMBER(1)")
            .with("Integer", "NUMBER(10)")
            .with("BigInt", "NUMBER(19)")
            .with("Double", "BINARY_DOUBLE")
            .with("Decimal", "NUMBER(18,4)")
            .with("String", "NVARCHAR2(1000)")
            .with("Binary", "BLOB")
            .with("Date", "DATE")
            .with("Time", "TIMESTAMP")
            .with("DateTime", "TIMESTAMP")
            .with("Json", "CLOB")
    }
}

/// SQL Server: `@name` binds, `OUTPUT INSERTED`, OFFSET/FETCH paging.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServer;

impl Dialect for SqlServer {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("[{}]", name)
    }

    fn placeholder(&self, name: &str, _index: usize) -> String {
        format!("@{}", name)
    }

    fn generated_key_clause(&self, column: &str) -> GeneratedKeyClause {
        GeneratedKeyClause::OutputInserted {
            column: column.to_string(),
        }
    }

    fn paged_query(&self, base: &str, offset: i64, limit: i64, order_by: Option<&str>) -> String {
        // OFFSET/FETCH is only legal under an ORDER BY.
        let order = order_by.unwrap_or("(SELECT NULL)");
        format!(
            "{base} ORDER BY {order} OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY"
        )
    }

    fn max_identifier_len(&self) -> usize {
        128
    }

    fn default_type_map(&self) -> TypeMap {
        TypeMap::new(self.name())
            .with("Boolean", "BIT")
            .with("Integer", "INT")
            .with("BigInt", "BIGINT")
            .with("Double", "FLOAT")
            .with("Decimal", "DECIMAL(18,4)")
            .with("String", "NVARCHAR(1000)")
            .with("Binary", "VARBINARY(MAX)")
            .with("Date", "DATE")
            .with("Time", "TIME")
            .with("DateTime", "DATETIME2")
            .with("Json", "NVARCHAR(MAX)")
    }
}

/// PostgreSQL: `$n` binds, `RETURNING`, LIMIT/OFFSET paging.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name)
    }

    fn placeholder(&self, _name: &str, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn generated_key_clause(&self, column: &str) -> GeneratedKeyClause {
        GeneratedKeyClause::Returning {
            column: column.to_string(),
        }
    }

    fn paged_query(&self, base: &str, offset: i64, limit: i64, order_by: Option<&str>) -> String {
        match order_by {
            Some(order) => format!("{base} ORDER BY {order} LIMIT {limit} OFFSET {offset}"),
            None => format!("{base} LIMIT {limit} OFFSET {offset}"),
        }
    }

    fn max_identifier_len(&self) -> usize {
        63
    }

    fn default_type_map(&self) -> TypeMap {
        TypeMap::new(self.name())
            .with("Boolean", "BOOLEAN")
            .with("Integer", "INTEGER")
            .with("BigInt", "BIGINT")
            .with("Double", "DOUBLE PRECISION")
            .with("Decimal", "NUMERIC(18,4)")
            .with("String", "VARCHAR(1000)")
            .with("Binary", "BYTEA")
            .with("Date", "DATE")
            .with("Time", "TIME")
            .with("DateTime", "TIMESTAMP")
            .with("Json", "JSONB")
    }
}

/// Resolve the column type text for a semantic type, preferring the
/// caller-supplied map and falling back to the dialect default.
pub fn resolve_column_type(
    dialect: &dyn Dialect,
    map: Option<&TypeMap>,
    scalar: ScalarType,
    max_length: Option<u32>,
) -> rowmap_core::Result<String> {
    match map {
        Some(map) => map.resolve_sized(scalar, max_length),
        None => dialect.default_type_map().resolve_sized(scalar, max_length),
    }
}
