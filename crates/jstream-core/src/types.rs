//! Values and rows.
//!
//! A `Value` carries exactly one of the two column types. Strings are raw
//! bytes: the wire allows embedded NULs and does not promise UTF-8, so text
//! conversion is lossy and only happens at rendering time.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::ColumnType;

/// One positional tuple of values matching a schema.
pub type Row = Vec<Value>;

/// Derived ordering compares the tag first (I64 before String), then the
/// payload: numerically for I64, byte-lexicographically for String.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Value {
    I64(i64),
    Str(Vec<u8>),
}

impl Value {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::I64(_) => ColumnType::I64,
            Value::Str(_) => ColumnType::String,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            Value::Str(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(b) => Some(b),
            Value::I64(_) => None,
        }
    }

    /// Textual form used by table rendering: decimal for numbers, the bytes
    /// verbatim (lossy UTF-8) for strings.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::I64(v) => Cow::Owned(v.to_string()),
            Value::Str(b) => String::from_utf8_lossy(b),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into_bytes())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Str(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Str(b.to_vec())
    }
}
