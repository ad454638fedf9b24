//! Windowing: offset / count / stride over a materialized stream.

use jstream_core::prelude::Schema;
use jstream_io::{RowSink, RowSource};
use tracing::debug;

use crate::plan::OpPlan;
use crate::traits::{OpError, Operator, RunStats};

/// `offset` and `num` accept negative values counted from the end of the
/// stream. `step` may be negative to walk backwards; it may not be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    offset: Option<i64>,
    num: Option<i64>,
    step: i64,
}

impl Default for Slice {
    fn default() -> Self {
        Self {
            offset: None,
            num: None,
            step: 1,
        }
    }
}

impl Slice {
    pub fn new(offset: Option<i64>, num: Option<i64>, step: i64) -> Result<Self, OpError> {
        if step == 0 {
            return Err(OpError::InvalidArgument("step must not be zero".into()));
        }
        Ok(Self { offset, num, step })
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Row indices selected from a stream of `len` rows, in emission order.
    pub fn indices(&self, len: usize) -> Vec<usize> {
        let len = len as i64;
        let start = match self.offset {
            Some(o) if o < 0 => len + o,
            Some(o) => o,
            None if self.step > 0 => 0,
            None => len - 1,
        };
        let limit = match self.num {
            Some(n) if n < 0 => (len + n).max(0),
            Some(n) => n,
            None => i64::MAX,
        };

        let mut picked = Vec::new();
        let mut i = start;
        while (picked.len() as i64) < limit && (0..len).contains(&i) {
            picked.push(i as usize);
            match i.checked_add(self.step) {
                Some(next) => i = next,
                None => break,
            }
        }
        picked
    }
}

impl Operator for Slice {
    fn name(&self) -> &'static str {
        "slice"
    }

    fn plan(&self, input_schema: &Schema) -> Result<OpPlan, OpError> {
        Ok(OpPlan::materializing(input_schema.clone()))
    }

    fn run(
        &self,
        input: &mut dyn RowSource,
        output: &mut dyn RowSink,
    ) -> Result<RunStats, OpError> {
        let mut rows: Vec<Option<_>> = input.drain()?.into_iter().map(Some).collect();
        let picked = self.indices(rows.len());
        debug!(rows = rows.len(), picked = picked.len(), "slice window");

        let mut stats = RunStats {
            rows_in: rows.len() as u64,
            rows_out: 0,
        };
        for idx in picked {
            // Positive or negative strides never revisit an index.
            if let Some(row) = rows[idx].take() {
                output.push_row(row)?;
                stats.rows_out += 1;
            }
        }
        Ok(stats)
    }
}
