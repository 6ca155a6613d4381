//! Host values exchanged with callers
//!
//! This enum covers every value shape a bind can carry or a column can
//! decode to. Values can be inspected with the `as_*` accessors or created
//! via the `From` implementations, which makes parameter lists read
//! naturally: `&[1.into(), "Alice".into()]`.

use bytes::Bytes;

use crate::types::{IntervalUnit, LobLocator, OracleNumber, Timestamp};

/// A host value bound into or decoded from a statement
#[derive(Debug, Clone)]
pub enum Value {
    /// NULL; also the decode result for empty strings/bytes, which the
    /// wire stores identically to NULL
    Null,
    /// String value (VARCHAR2, CHAR, CLOB content)
    String(String),
    /// Byte array (RAW, BLOB content)
    Bytes(Vec<u8>),
    /// Integer value (NUMBER with no fraction that fits i64)
    Integer(i64),
    /// Floating point value (NUMBER, BINARY_FLOAT, BINARY_DOUBLE)
    Float(f64),
    /// NUMBER carried at full precision as its decimal string
    Number(OracleNumber),
    /// Boolean value
    Boolean(bool),
    /// Timestamp with explicit UTC offset
    Timestamp(Timestamp),
    /// Interval year-to-month, as a signed total month count
    IntervalYearToMonth(i64),
    /// Interval day-to-second, as a signed total nanosecond count
    IntervalDayToSecond(i64),
    /// An interval amount expressed in a caller-chosen unit, converted to
    /// the matching signed count at encode time
    Interval {
        /// Amount in `unit`s; fractions round at the unit boundary
        amount: f64,
        /// The unit the caller requested
        unit: IntervalUnit,
    },
    /// A fetched LOB reference that has not been materialized yet
    Lob(LobLocator),
}

impl Value {
    /// Check if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as a string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(f) => Some(*f as i64),
            Value::Number(n) => n.to_i64().ok(),
            Value::Boolean(b) => Some(*b as i64),
            Value::IntervalYearToMonth(v) | Value::IntervalDayToSecond(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            Value::Number(n) => n.to_f64().ok(),
            _ => None,
        }
    }

    /// Try to get as bytes
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            Value::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Try to get as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }

    /// Try to get as a timestamp
    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Try to get as a LOB locator
    pub fn as_lob(&self) -> Option<&LobLocator> {
        match self {
            Value::Lob(locator) => Some(locator),
            _ => None,
        }
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Timestamp(v)
    }
}

impl From<OracleNumber> for Value {
    fn from(v: OracleNumber) -> Self {
        Value::Number(v)
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

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::String(s) => write!(f, "{}", s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Timestamp(ts) => write!(f, "{}", ts),
            Value::IntervalYearToMonth(m) => write!(f, "{} months", m),
            Value::IntervalDayToSecond(ns) => write!(f, "{} ns", ns),
            Value::Interval { amount, unit } => write!(f, "{} {:?}", amount, unit),
            Value::Lob(locator) => write!(f, "<LOB: {} bytes, locator>", locator.size()),
        }
    }
}
