//! Stable single-key sort. Materializes the whole input.

use std::cmp::Ordering;

use jstream_core::prelude::Schema;
use jstream_io::{RowSink, RowSource};
use tracing::debug;

use crate::plan::OpPlan;
use crate::traits::{resolve_column, OpError, Operator, RunStats};

#[derive(Debug, Clone)]
pub struct Sort {
    pub column: String,
    /// Invert the comparison. Ties keep input order either way.
    pub reverse: bool,
}

impl Sort {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            reverse: false,
        }
    }

    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }
}

impl Operator for Sort {
    fn name(&self) -> &'static str {
        "sort"
    }

    fn plan(&self, input_schema: &Schema) -> Result<OpPlan, OpError> {
        resolve_column(input_schema, &self.column)?;
        Ok(OpPlan::materializing(input_schema.clone()))
    }

    fn run(
        &self,
        input: &mut dyn RowSource,
        output: &mut dyn RowSink,
    ) -> Result<RunStats, OpError> {
        let key = resolve_column(input.schema(), &self.column)?;
        let mut rows = input.drain()?;
        let rows_in = rows.len() as u64;
        debug!(rows = rows_in, column = %self.column, reverse = self.reverse, "sorting");

        // Ties keep arrival order in both directions.
        rows.sort_by(|a, b| {
            let o: Ordering = a[key].cmp(&b[key]);
            if self.reverse {
                o.reverse()
            } else {
                o
            }
        });

        for row in rows {
            output.push_row(row)?;
        }
        Ok(RunStats {
            rows_in,
            rows_out: rows_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jstream_core::prelude::{Column, Row, Value};
    use jstream_io::MemorySource;

    fn schema() -> Schema {
        Schema::new(vec![Column::i64("k"), Column::string("tag")])
    }

    fn row(k: i64, tag: &str) -> Row {
        vec![Value::I64(k), Value::from(tag)]
    }

    fn sorted(sort: &Sort, rows: Vec<Row>) -> Vec<Row> {
        let mut src = MemorySource::new(schema(), rows);
        let mut out = Vec::new();
        sort.run(&mut src, &mut out).unwrap();
        out
    }

    fn input() -> Vec<Row> {
        vec![row(2, "a"), row(1, "b"), row(2, "c"), row(1, "d"), row(-5, "e")]
    }

    #[test]
    fn ascending_is_stable() {
        let out = sorted(&Sort::new("k"), input());
        assert_eq!(
            out,
            vec![row(-5, "e"), row(1, "b"), row(1, "d"), row(2, "a"), row(2, "c")]
        );
    }

    #[test]
    fn reverse_keeps_ties_in_input_order() {
        let out = sorted(&Sort::new("k").reversed(true), input());
        assert_eq!(
            out,
            vec![row(2, "a"), row(2, "c"), row(1, "b"), row(1, "d"), row(-5, "e")]
        );
    }

    #[test]
    fn equal_keys_keep_order_in_both_directions() {
        let rows = vec![row(1, "x"), row(1, "y"), row(0, "z")];
        assert_eq!(
            sorted(&Sort::new("k"), rows.clone()),
            vec![row(0, "z"), row(1, "x"), row(1, "y")]
        );
        assert_eq!(
            sorted(&Sort::new("k").reversed(true), rows),
            vec![row(1, "x"), row(1, "y"), row(0, "z")]
        );
    }

    #[test]
    fn strings_sort_bytewise() {
        let rows = vec![row(0, "b"), row(0, "B"), row(0, "a"), row(0, "ab")];
        let out = sorted(&Sort::new("tag"), rows);
        let tags: Vec<_> = out.iter().map(|r| r[1].to_text().into_owned()).collect();
        assert_eq!(tags, ["B", "a", "ab", "b"]);
    }

    #[test]
    fn unknown_column_fails_before_output() {
        let sort = Sort::new("missing");
        assert!(matches!(sort.plan(&schema()), Err(OpError::UnknownColumn(_))));
        let mut src = MemorySource::new(schema(), input());
        let mut out = Vec::new();
        assert!(sort.run(&mut src, &mut out).is_err());
        assert!(out.is_empty());
        assert_eq!(src.remaining(), 5);
    }
}
