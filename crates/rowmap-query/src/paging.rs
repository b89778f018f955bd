//! Paged and counted query synthesis.
//!
//! Paging wraps a caller-supplied base query in the dialect's paging
//! form; counting wraps it in `SELECT COUNT(*)`. Page arguments are
//! validated before any SQL is assembled so bad input never reaches the
//! database.

use rowmap_core::{Error, Result};

use crate::dialect::Dialect;
use crate::statement::Statement;

fn validated_base(base: &str) -> Result<&str> {
    let trimmed = base.trim();
    if trimmed.is_empty() {
        return Err(Error::argument_named("base", "base query must not be empty"));
    }
    Ok(trimmed)
}

fn apply_filter(base: &str, filter: Option<&str>) -> Result<String> {
    match filter {
        Some(f) if f.trim().is_empty() => {
            Err(Error::argument_named("filter", "must not be empty when supplied"))
        }
        Some(f) => Ok(format!("SELECT * FROM ({base}) q0 WHERE ({f})")),
        None => Ok(base.to_string()),
    }
}

/// Build a paged SELECT over a base query.
///
/// `page_index` is zero-based: size 10, index 1 yields rows 11 through
/// 20. A non-positive size or negative index is an argument error.
pub fn build_paginated_query(
    dialect: &dyn Dialect,
    base: &str,
    page_size: i64,
    page_index: i64,
    filter: Option<&str>,
    sort_column: Option<&str>,
    sort_ascending: bool,
) -> Result<Statement> {
    let base = validated_base(base)?;
    if page_size <= 0 {
        return Err(Error::argument_named("page_size", "must be positive"));
    }
    if page_index < 0 {
        return Err(Error::argument_named("page_index", "must not be negative"));
    }

    let inner = apply_filter(base, filter)?;
    let order_by = sort_column.map(|column| {
        format!("{} {}", column, if sort_ascending { "ASC" } else { "DESC" })
    });
    let offset = page_index * page_size;
    Statement::new(dialect.paged_query(&inner, offset, page_size, order_by.as_deref()))
}

/// Strip a trailing top-level ORDER BY clause from a query.
///
/// Only an ORDER BY outside every parenthesis and outside string
/// literals counts; ordering inside subqueries, window functions, and
/// quoted text is preserved.
fn strip_trailing_order_by(sql: &str) -> &str {
    let bytes = sql.as_bytes();
    let mut depth = 0usize;
    let mut in_literal = false;
    let mut cut = None;
    let mut i = 0;
    while i < bytes.len() {
        if in_literal {
            if bytes[i] == b'\'' {
                in_literal = false;
            }
            i += 1;
            continue;
        }
        match bytes[i] {
            b'\'' => in_literal = true,
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'O' | b'o' if depth == 0 && bytes[i..].len() >= 8 => {
                if bytes[i..i + 5].eq_ignore_ascii_case(b"ORDER") {
                    let mut j = i + 5;
                    while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                        j += 1;
                    }
                    if bytes[j..].len() >= 2 && bytes[j..j + 2].eq_ignore_ascii_case(b"BY") {
                        cut = Some(i);
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    match cut {
        Some(idx) => sql[..idx].trim_end(),
        None => sql,
    }
}

/// Build a row-count query over a base query.
///
/// A trailing ORDER BY on the base is dropped first; ordering a count is
/// meaningless and some engines reject it inside a derived table.
pub fn build_count_query(base: &str, filter: Option<&str>) -> Result<Statement> {
    let base = validated_base(base)?;
    let inner = apply_filter(strip_trailing_order_by(base), filter)?;
    Statement::new(format!("SELECT COUNT(*) FROM ({inner}) AS TotalCount"))
}
