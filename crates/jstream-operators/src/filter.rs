//! Filter operator: predicate evaluation plus optional key uniqueness.
//!
//! With `unique` set, every row's key is inserted into the seen-set before the
//! predicate is consulted, and a row passes only if its key was new *and* the
//! predicate holds. A repeated key is therefore always dropped, even when the
//! earlier row with that key failed the predicate.

use std::collections::HashSet;

use jstream_core::prelude::{Schema, Value};
use jstream_io::{RowSink, RowSource};
use tracing::debug;

use crate::expr::Predicate;
use crate::plan::OpPlan;
use crate::traits::{resolve_column, OpError, Operator, RunStats};

#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Predicate tokens: empty, or `<column> <operator> <operand>`.
    pub expr: Vec<String>,
    /// Key column for uniqueness mode.
    pub unique: Option<String>,
}

struct Bound {
    predicate: Predicate,
    unique: Option<usize>,
}

impl Filter {
    pub fn new(expr: Vec<String>) -> Self {
        Self { expr, unique: None }
    }

    pub fn with_unique(mut self, column: impl Into<String>) -> Self {
        self.unique = Some(column.into());
        self
    }

    fn bind(&self, schema: &Schema) -> Result<Bound, OpError> {
        let predicate = Predicate::parse(&self.expr, schema)?;
        let unique = self
            .unique
            .as_deref()
            .map(|name| resolve_column(schema, name))
            .transpose()?;
        Ok(Bound { predicate, unique })
    }
}

impl Operator for Filter {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn plan(&self, input_schema: &Schema) -> Result<OpPlan, OpError> {
        self.bind(input_schema)?;
        Ok(OpPlan::streaming(input_schema.clone()))
    }

    fn run(
        &self,
        input: &mut dyn RowSource,
        output: &mut dyn RowSink,
    ) -> Result<RunStats, OpError> {
        let bound = self.bind(input.schema())?;
        let mut seen: HashSet<Value> = HashSet::new();
        let mut stats = RunStats::default();

        while let Some(row) = input.next_row()? {
            stats.rows_in += 1;
            let first = match bound.unique {
                Some(key) => seen.insert(row[key].clone()),
                None => true,
            };
            if first && bound.predicate.evaluate(&row) {
                output.push_row(row)?;
                stats.rows_out += 1;
            }
        }

        if bound.unique.is_some() {
            debug!(distinct_keys = seen.len(), "filter uniqueness set");
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jstream_core::prelude::{Column, Row};
    use jstream_io::MemorySource;

    fn run(filter: &Filter, schema: Schema, rows: Vec<Row>) -> Result<Vec<Row>, OpError> {
        let mut src = MemorySource::new(schema, rows);
        let mut out = Vec::new();
        filter.run(&mut src, &mut out)?;
        Ok(out)
    }

    fn kv(k: &str, v: i64) -> Row {
        vec![Value::from(k), Value::I64(v)]
    }

    fn kv_schema() -> Schema {
        Schema::new(vec![Column::string("key"), Column::i64("n")])
    }

    #[test]
    fn always_true_is_identity() {
        let rows = vec![kv("b", 2), kv("a", 1), kv("b", 2)];
        let out = run(&Filter::default(), kv_schema(), rows.clone()).unwrap();
        assert_eq!(out, rows);
    }

    #[test]
    fn forwards_matching_rows() {
        let rows = vec![kv("apple", 1), kv("banana", 2), kv("grape", 3)];
        let filter = Filter::new(vec!["key".into(), "contains".into(), "ap".into()]);
        let out = run(&filter, kv_schema(), rows).unwrap();
        assert_eq!(out, vec![kv("apple", 1), kv("grape", 3)]);
    }

    #[test]
    fn unique_keeps_first_occurrence() {
        let rows = vec![kv("a", 1), kv("a", 2), kv("b", 3)];
        let filter = Filter::default().with_unique("key");
        let out = run(&filter, kv_schema(), rows).unwrap();
        assert_eq!(out, vec![kv("a", 1), kv("b", 3)]);
    }

    #[test]
    fn unique_consumes_keys_even_when_predicate_fails() {
        // ("x", "skip") fails the predicate but still claims key "x", so the
        // later ("x", "keep") row is dropped although it would pass.
        let schema = Schema::new(vec![
            Column::string("key"),
            Column::string("tag"),
        ]);
        let rows = vec![
            vec![Value::from("x"), Value::from("skip")],
            vec![Value::from("x"), Value::from("keep")],
            vec![Value::from("y"), Value::from("keep")],
        ];
        let filter =
            Filter::new(vec!["tag".into(), "==".into(), "keep".into()]).with_unique("key");
        let out = run(&filter, schema, rows).unwrap();
        assert_eq!(out, vec![vec![Value::from("y"), Value::from("keep")]]);
    }

    #[test]
    fn unique_on_numeric_column() {
        let rows = vec![kv("a", 1), kv("b", 1), kv("c", 2)];
        let filter = Filter::default().with_unique("n");
        let out = run(&filter, kv_schema(), rows).unwrap();
        assert_eq!(out, vec![kv("a", 1), kv("c", 2)]);
    }

    #[test]
    fn plan_reports_config_errors() {
        let filter = Filter::default().with_unique("missing");
        assert!(matches!(
            filter.plan(&kv_schema()),
            Err(OpError::UnknownColumn(_))
        ));

        let filter = Filter::new(vec!["key".into(), "<".into(), "a".into()]);
        assert!(matches!(
            filter.plan(&kv_schema()),
            Err(OpError::UnsupportedOperator(_))
        ));

        let plan = Filter::default().plan(&kv_schema()).unwrap();
        assert_eq!(plan.output_schema, kv_schema());
    }
}
