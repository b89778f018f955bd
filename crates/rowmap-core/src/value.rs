//! Dynamic SQL values.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A dynamically-typed SQL value.
///
/// This enum represents all column values rowmap can bind as statement
/// parameters or read back from result rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,

    /// Boolean value
    Bool(bool),

    /// 32-bit signed integer
    Int(i32),

    /// 64-bit signed integer
    BigInt(i64),

    /// 64-bit floating point
    Double(f64),

    /// Arbitrary precision decimal (stored as string)
    Decimal(String),

    /// Text string
    Text(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// Calendar date
    Date(NaiveDate),

    /// Time of day
    Time(NaiveTime),

    /// Date and time without timezone
    DateTime(NaiveDateTime),

    /// JSON value
    Json(serde_json::Value),
}

impl Value {
    /// Check if this value is NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the semantic type name of this value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Boolean",
            Value::Int(_) => "Integer",
            Value::BigInt(_) => "BigInt",
            Value::Double(_) => "Double",
            Value::Decimal(_) => "Decimal",
            Value::Text(_) => "String",
            Value::Bytes(_) => "Binary",
            Value::Date(_) => "Date",
            Value::Time(_) => "Time",
            Value::DateTime(_) => "DateTime",
            Value::Json(_) => "Json",
        }
    }

    /// Check whether this value is the default for its type.
    ///
    /// Foreign-key resolution treats a default key (NULL, zero, empty
    /// string) as "no related row referenced" and skips the lookup.
    #[must_use]
    pub fn is_default_key(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Int(v) => *v == 0,
            Value::BigInt(v) => *v == 0,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Try to convert this value to a bool.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            Value::Int(v) => Some(*v != 0),
            Value::BigInt(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// Try to convert this value to an i64.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(i64::from(*v)),
            Value::BigInt(v) => Some(*v),
            Value::Bool(v) => Some(if *v { 1 } else { 0 }),
            _ => None,
        }
    }

    /// Try to convert this value to an f64.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Int(v) => Some(f64::from(*v)),
            Value::BigInt(v) => Some(*v as f64),
            Value::Decimal(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Decimal(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            Value::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Render this value as the textual form a SQL dialect expects.
    ///
    /// Booleans become `1`/`0`, temporals become canonical strings,
    /// decimals pass through as their digit text. Embedded single quotes
    /// in strings are escaped by doubling. Bound parameters remain the
    /// preferred path; this form exists for generated DDL defaults and
    /// diagnostic rendering of statement plans.
    #[must_use]
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(v) => if *v { "1" } else { "0" }.to_string(),
            Value::Int(v) => v.to_string(),
            Value::BigInt(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::Decimal(s) => s.clone(),
            Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Value::Bytes(b) => {
                let mut hex = String::with_capacity(b.len() * 2 + 3);
                hex.push_str("X'");
                for byte in b {
                    hex.push_str(&format!("{:02X}", byte));
                }
                hex.push('\'');
                hex
            }
            Value::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
            Value::Time(t) => format!("'{}'", t.format("%H:%M:%S")),
            Value::DateTime(dt) => format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Json(j) => format!("'{}'", j.to_string().replace('\'', "''")),
        }
    }

    /// Convert a `u64` to `Value`, clamping to `i64::MAX` if it overflows.
    ///
    /// A warning is logged when clamping occurs.
    #[must_use]
    pub fn from_u64_clamped(v: u64) -> Self {
        if let Ok(signed) = i64::try_from(v) {
            Value::BigInt(signed)
        } else {
            tracing::warn!(
                value = v,
                clamped_to = i64::MAX,
                "u64 value exceeds i64::MAX; clamping"
            );
            Value::BigInt(i64::MAX)
        }
    }
}

// Conversion implementations
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_literal_renders_one_zero() {
        assert_eq!(Value::Bool(true).to_sql_literal(), "1");
        assert_eq!(Value::Bool(false).to_sql_literal(), "0");
    }

    #[test]
    fn test_text_literal_doubles_quotes() {
        assert_eq!(
            Value::Text("O'Brien".to_string()).to_sql_literal(),
            "'O''Brien'"
        );
    }

    #[test]
    fn test_date_literal_canonical_form() {
        let d = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        assert_eq!(Value::Date(d).to_sql_literal(), "'2023-04-01'");
    }

    #[test]
    fn test_datetime_literal_canonical_form() {
        let dt = NaiveDate::from_ymd_opt(2023, 4, 1)
            .unwrap()
            .and_hms_opt(13, 30, 5)
            .unwrap();
        assert_eq!(Value::DateTime(dt).to_sql_literal(), "'2023-04-01 13:30:05'");
    }

    #[test]
    fn test_decimal_literal_passes_through() {
        assert_eq!(
            Value::Decimal("1234.5600".to_string()).to_sql_literal(),
            "1234.5600"
        );
    }

    #[test]
    fn test_null_literal() {
        assert_eq!(Value::Null.to_sql_literal(), "NULL");
    }

    #[test]
    fn test_bytes_literal_hex() {
        assert_eq!(Value::Bytes(vec![0xAB, 0x01]).to_sql_literal(), "X'AB01'");
    }

    #[test]
    fn test_default_key_detection() {
        assert!(Value::Null.is_default_key());
        assert!(Value::BigInt(0).is_default_key());
        assert!(Value::Text(String::new()).is_default_key());
        assert!(!Value::BigInt(7).is_default_key());
        assert!(!Value::Text("k".to_string()).is_default_key());
    }

    #[test]
    fn test_option_conversion() {
        let some: Value = Some(5_i64).into();
        let none: Value = Option::<i64>::None.into();
        assert_eq!(some, Value::BigInt(5));
        assert_eq!(none, Value::Null);
    }

    #[test]
    fn test_as_i64_coercions() {
        assert_eq!(Value::Int(3).as_i64(), Some(3));
        assert_eq!(Value::Bool(true).as_i64(), Some(1));
        assert_eq!(Value::Text("x".into()).as_i64(), None);
    }

    #[test]
    fn test_from_u64_clamped() {
        assert_eq!(Value::from_u64_clamped(42), Value::BigInt(42));
        assert_eq!(Value::from_u64_clamped(u64::MAX), Value::BigInt(i64::MAX));
    }
}
