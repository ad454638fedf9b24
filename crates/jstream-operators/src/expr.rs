//! Filter predicates.
//!
//! A predicate is built from exactly three tokens, `<column> <operator> <operand>`,
//! or from no tokens at all (always true). Supported operators:
//!
//! - `contains`: byte-wise, case-sensitive substring test
//! - `==`: exact byte equality
//! - `=~`: unanchored regex search
//!
//! Every operator applies to string columns only.

use jstream_core::prelude::{ColumnType, Schema, Value};
use regex::bytes::Regex;

use crate::traits::{resolve_column, OpError};

#[derive(Debug, Clone)]
pub enum Predicate {
    Always,
    Contains { column: usize, needle: Vec<u8> },
    Equals { column: usize, literal: Vec<u8> },
    RegexSearch { column: usize, regex: Regex },
}

impl Predicate {
    /// Build a predicate from command-line tokens against `schema`.
    ///
    /// Checks run in order: token count, column name, operator, column type,
    /// regex compilation.
    pub fn parse<S: AsRef<str>>(tokens: &[S], schema: &Schema) -> Result<Self, OpError> {
        match tokens {
            [] => Ok(Predicate::Always),
            [column, op, operand] => {
                Self::build(column.as_ref(), op.as_ref(), operand.as_ref(), schema)
            }
            other => Err(OpError::InvalidArgument(format!(
                "expected `<column> <operator> <operand>`, got {} token(s)",
                other.len()
            ))),
        }
    }

    fn build(column: &str, op: &str, operand: &str, schema: &Schema) -> Result<Self, OpError> {
        let idx = resolve_column(schema, column)?;
        if !matches!(op, "contains" | "==" | "=~") {
            return Err(OpError::UnsupportedOperator(op.to_string()));
        }
        let column_type = schema.columns[idx].column_type;
        if column_type != ColumnType::String {
            return Err(OpError::InvalidArgument(format!(
                "column '{column}' is {column_type}; '{op}' needs a string column"
            )));
        }

        Ok(match op {
            "contains" => Predicate::Contains {
                column: idx,
                needle: operand.as_bytes().to_vec(),
            },
            "==" => Predicate::Equals {
                column: idx,
                literal: operand.as_bytes().to_vec(),
            },
            _ => Predicate::RegexSearch {
                column: idx,
                regex: Regex::new(operand)?,
            },
        })
    }

    pub fn evaluate(&self, row: &[Value]) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Contains { column, needle } => {
                string_at(row, *column).is_some_and(|s| contains_bytes(s, needle))
            }
            Predicate::Equals { column, literal } => {
                string_at(row, *column).is_some_and(|s| s == literal.as_slice())
            }
            Predicate::RegexSearch { column, regex } => {
                string_at(row, *column).is_some_and(|s| regex.is_match(s))
            }
        }
    }
}

fn string_at(row: &[Value], column: usize) -> Option<&[u8]> {
    row.get(column).and_then(Value::as_bytes)
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}
