use thiserror::Error;

use crate::schema::ColumnType;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("row has {found} values but the schema has {expected} columns")]
    Arity { expected: usize, found: usize },

    #[error("column '{column}' is declared {expected} but the row holds {found}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        found: ColumnType,
    },

    #[error("Internal invariant failed: {0}")]
    Invariant(String),
}
