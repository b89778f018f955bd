//! Statement value objects.
//!
//! A [`Statement`] is an immutable pairing of SQL text with its named
//! parameters, produced by the builders and consumed by an executor. An
//! [`InsertPlan`] extends that to generated-key inserts: the primary
//! INSERT plus any link-table inserts that cannot be completed until the
//! database hands back the new key.

use rowmap_core::{Error, Result, Value};

/// One executable SQL statement with its bind parameters.
#[derive(Debug, Clone)]
pub struct Statement {
    sql: String,
    params: Vec<(String, Value)>,
    output_params: Vec<String>,
}

impl Statement {
    /// Create a statement from SQL text.
    ///
    /// Empty or whitespace-only text is an argument error; a statement
    /// never exists without SQL.
    pub fn new(sql: impl Into<String>) -> Result<Self> {
        let sql = sql.into();
        if sql.trim().is_empty() {
            return Err(Error::argument_named("sql", "statement text must not be empty"));
        }
        Ok(Self {
            sql,
            params: Vec::new(),
            output_params: Vec::new(),
        })
    }

    /// Bind a named parameter. Parameter names are unique per statement;
    /// a duplicate is an argument error.
    pub fn bind(mut self, name: impl Into<String>, value: Value) -> Result<Self> {
        let name = name.into();
        if self.params.iter().any(|(n, _)| *n == name) {
            return Err(Error::argument_named(
                "name",
                format!("parameter `{}` is already bound", name),
            ));
        }
        self.params.push((name, value));
        Ok(self)
    }

    /// Declare an output parameter (a bind the database writes into).
    #[must_use]
    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.output_params.push(name.into());
        self
    }

    /// The SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &[(String, Value)] {
        &self.params
    }

    /// Declared output parameter names.
    #[must_use]
    pub fn output_params(&self) -> &[String] {
        &self.output_params
    }

    pub(crate) fn rebind(&mut self, name: &str, value: Value) -> bool {
        let mut hit = false;
        for (n, v) in &mut self.params {
            if n == name {
                *v = value.clone();
                hit = true;
            }
        }
        hit
    }
}

/// Parameter name standing in for a not-yet-generated owner key in link
/// statements.
pub const OWNER_KEY_HOLE: &str = "OwnerKey";

/// A generated-key INSERT plus its dependent link-table inserts.
///
/// The primary statement runs first and yields the generated key; the
/// link statements each carry a named hole bound afterwards through
/// [`InsertPlan::bind_generated_key`]. A plan without link statements is
/// the common single-statement case.
#[derive(Debug, Clone)]
pub struct InsertPlan {
    primary: Statement,
    links: Vec<Statement>,
    hole: Option<String>,
}

impl InsertPlan {
    /// Wrap a standalone INSERT.
    #[must_use]
    pub fn single(primary: Statement) -> Self {
        Self {
            primary,
            links: Vec::new(),
            hole: None,
        }
    }

    /// Wrap an INSERT with pending link statements sharing a named hole.
    #[must_use]
    pub fn with_links(primary: Statement, links: Vec<Statement>, hole: impl Into<String>) -> Self {
        Self {
            primary,
            links,
            hole: Some(hole.into()),
        }
    }

    /// Wrap an INSERT with link statements whose owner key is already
    /// bound (the key was known at build time).
    #[must_use]
    pub fn with_bound_links(primary: Statement, links: Vec<Statement>) -> Self {
        Self {
            primary,
            links,
            hole: None,
        }
    }

    /// The primary INSERT.
    #[must_use]
    pub fn primary(&self) -> &Statement {
        &self.primary
    }

    /// Link statements still awaiting the generated key.
    #[must_use]
    pub fn link_statements(&self) -> &[Statement] {
        &self.links
    }

    /// The hole name, when link statements exist.
    #[must_use]
    pub fn hole(&self) -> Option<&str> {
        self.hole.as_deref()
    }

    /// Fill the named hole in every link statement with the generated
    /// key and return the now-complete statements.
    ///
    /// A link statement missing its hole parameter is a mapping defect
    /// in the builder and reported as an argument error.
    pub fn bind_generated_key(self, key: &Value) -> Result<Vec<Statement>> {
        let Some(hole) = self.hole else {
            return Ok(self.links);
        };
        let mut links = self.links;
        for stmt in &mut links {
            if !stmt.rebind(&hole, key.clone()) {
                return Err(Error::argument_named(
                    "key",
                    format!("link statement has no `{}` parameter to fill", hole),
                ));
            }
        }
        Ok(links)
    }
}
