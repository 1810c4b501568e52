use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Decimal(Decimal),
    String(String),
    Bytes(Vec<u8>),
    DateTime(DateTime<Utc>),
    Json(Value),
}

impl SqlValue {
    /// Whether the value is the zero value of its type.
    pub fn is_blank(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::Bool(value) => !value,
            SqlValue::I64(value) => *value == 0,
            SqlValue::U64(value) => *value == 0,
            SqlValue::F64(value) => value.to_bits() == 0,
            SqlValue::Decimal(value) => value.is_zero(),
            SqlValue::String(value) => value.is_empty(),
            SqlValue::Bytes(value) => value.is_empty(),
            SqlValue::DateTime(value) => *value == DateTime::<Utc>::UNIX_EPOCH,
            SqlValue::Json(value) => value.is_null(),
        }
    }

    /// Maps a JSON value onto the closest bound value type.
    pub fn from_json(value: &Value) -> SqlValue {
        match value {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SqlValue::I64(i)
                } else if let Some(u) = n.as_u64() {
                    SqlValue::U64(u)
                } else {
                    n.as_f64().map(SqlValue::F64).unwrap_or(SqlValue::Null)
                }
            }
            Value::String(s) => SqlValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => SqlValue::Json(value.clone()),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(value) => write!(f, "{}", value),
            SqlValue::I64(value) => write!(f, "{}", value),
            SqlValue::U64(value) => write!(f, "{}", value),
            SqlValue::F64(value) => write!(f, "{}", value),
            SqlValue::Decimal(value) => write!(f, "{}", value),
            SqlValue::String(value) => write!(f, "'{}'", value.replace('\'', "''")),
            SqlValue::Bytes(value) => write!(f, "<{} bytes>", value.len()),
            SqlValue::DateTime(value) => write!(f, "'{}'", value.format("%Y-%m-%d %H:%M:%S%.6f")),
            SqlValue::Json(value) => write!(f, "'{}'", value),
        }
    }
}

/// Converts a record field into its bound value and reports whether it is unset.
pub trait ToSqlValue {
    fn to_sql_value(&self) -> SqlValue;

    fn is_blank(&self) -> bool {
        self.to_sql_value().is_blank()
    }
}

macro_rules! impl_signed {
    ($($t:ty),+ $(,)?) => {
        $(
            impl From<$t> for SqlValue {
                fn from(value: $t) -> Self {
                    SqlValue::I64(value as i64)
                }
            }

            impl ToSqlValue for $t {
                fn to_sql_value(&self) -> SqlValue {
                    SqlValue::I64(*self as i64)
                }

                fn is_blank(&self) -> bool {
                    *self == 0
                }
            }
        )+
    };
}

macro_rules! impl_unsigned {
    ($($t:ty),+ $(,)?) => {
        $(
            impl From<$t> for SqlValue {
                fn from(value: $t) -> Self {
                    SqlValue::U64(value as u64)
                }
            }

            impl ToSqlValue for $t {
                fn to_sql_value(&self) -> SqlValue {
                    SqlValue::U64(*self as u64)
                }

                fn is_blank(&self) -> bool {
                    *self == 0
                }
            }
        )+
    };
}

impl_signed!(i8, i16, i32, i64);
impl_unsigned!(u8, u16, u32, u64);

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        SqlValue::F64(value as f64)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::F64(value)
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        SqlValue::Decimal(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::String(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::String(value.to_string())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Bytes(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::DateTime(value)
    }
}

impl From<Value> for SqlValue {
    fn from(value: Value) -> Self {
        SqlValue::Json(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Bool(*self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::F64(*self as f64)
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::F64(*self)
    }
}

impl ToSqlValue for Decimal {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Decimal(*self)
    }
}

impl ToSqlValue for String {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::String(self.clone())
    }

    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::String(self.to_string())
    }

    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Bytes(self.clone())
    }

    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl ToSqlValue for DateTime<Utc> {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::DateTime(*self)
    }
}

impl ToSqlValue for Value {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Json(self.clone())
    }
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(&self) -> SqlValue {
        self.clone()
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(&self) -> SqlValue {
        match self {
            Some(value) => value.to_sql_value(),
            None => SqlValue::Null,
        }
    }

    fn is_blank(&self) -> bool {
        self.is_none()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_blank_values() {
        assert!(0_i32.is_blank());
        assert!(!7_u16.is_blank());
        assert!(String::new().is_blank());
        assert!(!"x".to_string().is_blank());
        assert!(!true.is_blank());
        assert!(false.is_blank());
        assert!(None::<i64>.is_blank());
        // Some(0) is set, even though the inner value is zero
        assert!(!Some(0_i64).is_blank());
        assert!(DateTime::<Utc>::UNIX_EPOCH.is_blank());
        assert!(!Utc::now().is_blank());
    }

    #[test]
    fn test_option_into_sql_value() {
        assert_eq!(SqlValue::from(None::<String>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some("a")), SqlValue::String("a".to_string()));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(SqlValue::from_json(&json!(null)), SqlValue::Null);
        assert_eq!(SqlValue::from_json(&json!(-4)), SqlValue::I64(-4));
        assert_eq!(SqlValue::from_json(&json!(u64::MAX)), SqlValue::U64(u64::MAX));
        assert_eq!(SqlValue::from_json(&json!(1.5)), SqlValue::F64(1.5));
        assert_eq!(SqlValue::from_json(&json!("hey")), SqlValue::String("hey".to_string()));
        assert_eq!(SqlValue::from_json(&json!([1, 2])), SqlValue::Json(json!([1, 2])));
    }

    #[test]
    fn test_display_escapes_strings() {
        assert_eq!(SqlValue::String("it's".to_string()).to_string(), "'it''s'");
        assert_eq!(SqlValue::Null.to_string(), "NULL");
        assert_eq!(SqlValue::U64(3).to_string(), "3");
    }
}
