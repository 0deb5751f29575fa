//! Typed cells and rows handed to the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column types the producer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    Varchar,
    Integer,
    BigInt,
    Double,
    Boolean,
    Blob,
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalType::Varchar => "VARCHAR",
            LogicalType::Integer => "INTEGER",
            LogicalType::BigInt => "BIGINT",
            LogicalType::Double => "DOUBLE",
            LogicalType::Boolean => "BOOLEAN",
            LogicalType::Blob => "BLOB",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Varchar(String),
    Integer(i32),
    BigInt(i64),
    Double(f64),
    Boolean(bool),
    Blob(Vec<u8>),
}

impl Value {
    pub fn logical_type(&self) -> LogicalType {
        match self {
            Value::Varchar(_) => LogicalType::Varchar,
            Value::Integer(_) => LogicalType::Integer,
            Value::BigInt(_) => LogicalType::BigInt,
            Value::Double(_) => LogicalType::Double,
            Value::Boolean(_) => LogicalType::Boolean,
            Value::Blob(_) => LogicalType::Blob,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Varchar(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value widened to i64, for `Integer` and `BigInt` cells.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(i64::from(*v)),
            Value::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Varchar(s) => write!(f, "{s}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::BigInt(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Varchar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Varchar(s.to_string())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
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

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

/// One immutable row: cells in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row(Vec<Value>);

impl Row {
    pub fn new(cells: Vec<Value>) -> Self {
        Self(cells)
    }

    pub fn cells(&self) -> &[Value] {
        &self.0
    }

    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.0.get(idx)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(cells: Vec<Value>) -> Self {
        Self(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_reports_its_type() {
        assert_eq!(Value::from("x").logical_type(), LogicalType::Varchar);
        assert_eq!(Value::from(1i32).logical_type(), LogicalType::Integer);
        assert_eq!(Value::from(1i64).logical_type(), LogicalType::BigInt);
        assert_eq!(Value::from(1.5).logical_type(), LogicalType::Double);
        assert_eq!(Value::from(true).logical_type(), LogicalType::Boolean);
        assert_eq!(Value::from(vec![1u8]).logical_type(), LogicalType::Blob);
    }

    #[test]
    fn accessors_widen_integers() {
        assert_eq!(Value::Integer(7).as_i64(), Some(7));
        assert_eq!(Value::BigInt(-3).as_i64(), Some(-3));
        assert_eq!(Value::Varchar("7".into()).as_i64(), None);
    }

    #[test]
    fn blob_display_shows_length() {
        assert_eq!(Value::Blob(vec![0; 12]).to_string(), "<12 bytes>");
    }
}
