use std::fmt;

use serde::Serialize;
use toml::Value;

/// A persisted setting value, already coerced to its declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredValue {
    /// Text value.
    Text(String),

    /// Boolean value.
    Flag(bool),

    /// Numeric value.
    Number(f64),
}

impl StoredValue {
    /// Converts a value read from the TOML file.
    ///
    /// Integers written by other tools are widened to floats. Arrays, tables
    /// and datetimes have no meaning in the flat settings namespace and yield
    /// `None`.
    pub fn from_toml(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(StoredValue::Text(s.clone())),
            Value::Boolean(b) => Some(StoredValue::Flag(*b)),
            Value::Float(f) => Some(StoredValue::Number(*f)),
            Value::Integer(i) => Some(StoredValue::Number(*i as f64)),
            _ => None,
        }
    }

    /// Converts the value for writing into the TOML file.
    pub fn to_toml(&self) -> Value {
        match self {
            StoredValue::Text(s) => Value::String(s.clone()),
            StoredValue::Flag(b) => Value::Boolean(*b),
            StoredValue::Number(n) => Value::Float(*n),
        }
    }
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredValue::Text(s) => f.write_str(s),
            StoredValue::Flag(b) => write!(f, "{b}"),
            StoredValue::Number(n) => write!(f, "{n}"),
        }
    }
}
