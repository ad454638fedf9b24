//! Projection: keep the named columns, in the requested order.

use jstream_core::prelude::Schema;
use jstream_io::{RowSink, RowSource};

use crate::plan::OpPlan;
use crate::traits::{resolve_column, OpError, Operator, RunStats};

#[derive(Debug, Clone, Default)]
pub struct Select {
    pub columns: Vec<String>,
}

impl Select {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    fn indices(&self, schema: &Schema) -> Result<Vec<usize>, OpError> {
        self.columns
            .iter()
            .map(|name| resolve_column(schema, name))
            .collect()
    }
}

impl Operator for Select {
    fn name(&self) -> &'static str {
        "select"
    }

    fn plan(&self, input_schema: &Schema) -> Result<OpPlan, OpError> {
        let indices = self.indices(input_schema)?;
        Ok(OpPlan::streaming(input_schema.project(&indices)?))
    }

    fn run(
        &self,
        input: &mut dyn RowSource,
        output: &mut dyn RowSink,
    ) -> Result<RunStats, OpError> {
        let indices = self.indices(input.schema())?;
        let mut stats = RunStats::default();
        while let Some(row) = input.next_row()? {
            stats.rows_in += 1;
            let projected = indices.iter().map(|&i| row[i].clone()).collect();
            output.push_row(projected)?;
            stats.rows_out += 1;
        }
        Ok(stats)
    }
}
