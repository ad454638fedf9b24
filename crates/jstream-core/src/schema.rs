//! Column descriptors and the per-stream schema.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::{hash_columns, Hash256};
use crate::types::Value;

/// Declared type of a column. The discriminants are the wire tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ColumnType {
    /// Placeholder for an unset type; never part of a live schema.
    Invalid = 0,
    I64 = 1,
    String = 2,
}

impl ColumnType {
    /// Map a wire tag back to a type. Unknown tags yield `None`.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(ColumnType::Invalid),
            1 => Some(ColumnType::I64),
            2 => Some(ColumnType::String),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Invalid => "invalid",
            ColumnType::I64 => "i64",
            ColumnType::String => "string",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    pub fn i64(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::I64)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String)
    }
}

/// Ordered column list for one stream. Immutable once a stream is opened.
///
/// Names are unique by convention only; lookups resolve to the first match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Build a schema holding the columns at `indices`, in that order.
    /// Repeated indices produce repeated columns.
    pub fn project(&self, indices: &[usize]) -> Result<Schema> {
        let columns = indices
            .iter()
            .map(|&i| {
                self.columns.get(i).cloned().ok_or_else(|| {
                    Error::Invariant(format!(
                        "projection index {i} out of range for {} columns",
                        self.columns.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Schema { columns })
    }

    /// Reject schemas that may not appear on a live stream.
    pub fn validate(&self) -> Result<()> {
        if let Some(col) = self
            .columns
            .iter()
            .find(|c| c.column_type == ColumnType::Invalid)
        {
            return Err(Error::Schema(format!(
                "column '{}' has no valid type",
                col.name
            )));
        }
        Ok(())
    }

    /// Check the row invariant: one value per column, tags matching.
    pub fn check_row(&self, row: &[Value]) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::Arity {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        for (col, value) in self.columns.iter().zip(row) {
            if value.column_type() != col.column_type {
                return Err(Error::TypeMismatch {
                    column: col.name.clone(),
                    expected: col.column_type,
                    found: value.column_type(),
                });
            }
        }
        Ok(())
    }

    /// Stable digest of the column layout, used to spot producer/consumer
    /// schema drift in logs.
    pub fn fingerprint(&self) -> Hash256 {
        hash_columns(&self.columns)
    }
}
