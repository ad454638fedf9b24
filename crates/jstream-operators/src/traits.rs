//! Operator trait + common interfaces.
//!
//! The runtime calls `plan(...)` with the decoded input schema to obtain the
//! output schema, opens the output stream with it, then calls `run(...)`.

use jstream_core::prelude::Schema;
use jstream_io::{RowSink, RowSource};

use crate::plan::OpPlan;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("unsupported operator '{0}'")]
    UnsupportedOperator(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid regex: {0}")]
    Regex(#[from] regex::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Schema(#[from] jstream_core::Error),

    #[error(transparent)]
    Stream(#[from] jstream_io::Error),
}

impl OpError {
    /// Process exit status for this error class.
    pub fn exit_code(&self) -> i32 {
        match self {
            OpError::InvalidArgument(_) | OpError::Regex(_) => 2,
            OpError::UnknownColumn(_) => 3,
            OpError::UnsupportedOperator(_) => 4,
            OpError::InvalidInput(_) | OpError::Schema(_) => 5,
            OpError::Stream(e) => stream_exit_code(e),
        }
    }

}

/// Exit status for a failure inside the stream layer: malformed input, and
/// names or values too long to frame, are 5; everything else (I/O, broken
/// pipe) is 1.
pub fn stream_exit_code(e: &jstream_io::Error) -> i32 {
    match e {
        e if e.is_corruption() => 5,
        jstream_io::Error::Core(_) | jstream_io::Error::TooLong { .. } => 5,
        _ => 1,
    }
}

/// Row counts for one operator run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub rows_in: u64,
    pub rows_out: u64,
}

/// Trait that all stream operators implement.
///
/// Invariants:
/// - `plan` fails on every configuration problem it can detect from the
///   schema; `run` repeats the same resolution and never emits before it.
/// - `run` forwards rows that satisfy the output schema returned by `plan`.
pub trait Operator {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Resolve against the input schema and describe the output.
    fn plan(&self, input_schema: &Schema) -> Result<OpPlan, OpError>;

    /// Drive the whole input stream into `output`.
    fn run(
        &self,
        input: &mut dyn RowSource,
        output: &mut dyn RowSink,
    ) -> Result<RunStats, OpError>;
}

/// Index of the first column called `name`.
pub fn resolve_column(schema: &Schema, name: &str) -> Result<usize, OpError> {
    schema
        .index_of(name)
        .ok_or_else(|| OpError::UnknownColumn(name.to_string()))
}
